//! API key authentication.
//!
//! Every `/api/*` route except health requires the shared secret in
//! `X-API-Key`. The check runs before body parsing, so an unauthenticated
//! request with a malformed body still gets 401.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Axum middleware rejecting requests without the configured API key.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorized = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|key| key == state.config.api_key)
        .unwrap_or(false);

    if !authorized {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with missing or invalid API key"
        );
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(request).await)
}
