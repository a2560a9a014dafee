use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::models::{ChatRequest, ChatResponse};
use crate::AppState;

/// Chat bot message handler, minus the bot transport.
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::json_body_required())?;

    let reply = state.chat.handle(&request.user_id, &request.text, &state.ledger);
    Ok(Json(ChatResponse { reply }))
}
