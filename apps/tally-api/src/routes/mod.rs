//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  public                                                                 │
//! │    GET    /api/health                                                   │
//! │                                                                         │
//! │  X-API-Key required (route_layer)                                       │
//! │    GET    /api/operations                                               │
//! │    POST   /api/calculate                                                │
//! │    GET    /api/history?limit=N                                          │
//! │    DELETE /api/history                                                  │
//! │    DELETE /api/history/{id}                                             │
//! │    POST   /api/keypad/sessions                                          │
//! │    GET    /api/keypad/sessions/{id}                                     │
//! │    DELETE /api/keypad/sessions/{id}                                     │
//! │    POST   /api/keypad/sessions/{id}/keys                                │
//! │    POST   /api/chat                                                     │
//! │                                                                         │
//! │  fallback: 404 with the endpoint list (no key needed)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod calculate;
pub mod chat;
pub mod health;
pub mod history;
pub mod keypad;
pub mod operations;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_api_key;
use crate::error::ApiError;
use crate::AppState;

/// Builds the full application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/operations", get(operations::list_operations))
        .route("/api/calculate", post(calculate::calculate))
        .route(
            "/api/history",
            get(history::list_history).delete(history::clear_history),
        )
        .route("/api/history/{id}", delete(history::delete_entry))
        .route("/api/keypad/sessions", post(keypad::create_session))
        .route(
            "/api/keypad/sessions/{id}",
            get(keypad::get_session).delete(keypad::delete_session),
        )
        .route("/api/keypad/sessions/{id}/keys", post(keypad::press_key))
        .route("/api/chat", post(chat::handle_chat))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health_check))
        .merge(protected)
        .fallback(endpoint_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn endpoint_not_found() -> ApiError {
    ApiError::endpoint_not_found()
}
