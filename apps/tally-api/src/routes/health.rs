use axum::Json;

use crate::models::HealthResponse;

/// Liveness check. No API key required.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Calculator API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
