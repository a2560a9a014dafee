//! Keypad session endpoints.
//!
//! Engine failures (division by zero, overflow) are not HTTP errors here:
//! the press succeeds, the keypad resets, and `error` is set in the body.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tally_core::Key;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{KeyPressRequest, KeypadResponse, MessageResponse};
use crate::AppState;

fn session_not_found(raw_id: &str) -> ApiError {
    ApiError::not_found(format!("Keypad session {} not found", raw_id))
}

fn parse_session_id(raw_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw_id).map_err(|_| session_not_found(raw_id))
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<KeypadResponse>) {
    let (id, snapshot) = state.keypads.create();
    info!(session_id = %id, "Keypad session opened");
    (StatusCode::CREATED, Json(KeypadResponse::new(id, snapshot)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<KeypadResponse>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    let snapshot = state.keypads.snapshot(id).ok_or_else(|| session_not_found(&raw_id))?;
    Ok(Json(KeypadResponse::new(id, snapshot)))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    if !state.keypads.remove(id) {
        return Err(session_not_found(&raw_id));
    }

    info!(session_id = %id, "Keypad session closed");
    Ok(Json(MessageResponse {
        message: format!("Keypad session {} closed", id),
    }))
}

pub async fn press_key(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<KeyPressRequest>, JsonRejection>,
) -> Result<Json<KeypadResponse>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    let Json(request) = payload.map_err(|rejection| {
        debug!(%rejection, "Rejected key press body");
        ApiError::json_body_required()
    })?;

    let key: Key = request
        .key
        .parse()
        .map_err(|e: tally_core::keypad::UnknownKey| ApiError::bad_request(e.to_string()))?;

    let outcome = state
        .keypads
        .press(id, key, &state.ledger)
        .ok_or_else(|| session_not_found(&raw_id))?;

    if let Some(record) = &outcome.recorded {
        info!(session_id = %id, id = record.id, expression = %record.expression, "Keypad calculation recorded");
    }

    Ok(Json(KeypadResponse {
        session_id: id,
        snapshot: outcome.snapshot,
        error: outcome.error.map(|e| e.to_string()),
        recorded: outcome.recorded,
    }))
}
