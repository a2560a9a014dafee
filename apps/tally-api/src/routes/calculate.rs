//! `POST /api/calculate`
//!
//! ## Request Pipeline
//! ```text
//! body ──► JSON? ──► validate_request ──► evaluate ──► ledger.append ──► 200
//!            │              │                 │               │
//!            ▼              ▼                 ▼               └──► notify (detached)
//!           400            400          400 / 500
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;
use tally_core::validation::{validate_request, CalculationRequest};
use tally_core::CoreError;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::CalculateResponse;
use crate::notify;
use crate::AppState;

/// Per-request override of the notification destination.
pub const CHAT_ID_HEADER: &str = "X-Telegram-Chat-ID";

pub async fn calculate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!(%rejection, "Rejected calculation body");
        ApiError::json_body_required()
    })?;

    let request = validate_request(&payload)?;
    let result = request
        .evaluate()
        .map_err(|e| calculation_error(e, &request))?;

    let record = state
        .ledger
        .with_ledger_mut(|ledger| ledger.append(request.operation, request.a, request.b, result));

    info!(id = record.id, expression = %record.expression, "Calculation recorded");

    let destination = notify::resolve_destination(
        headers.get(CHAT_ID_HEADER).and_then(|v| v.to_str().ok()),
        state.config.telegram_chat_id.as_deref(),
    );
    notify::dispatch_if_enabled(state.notifier.as_ref(), destination, &record.expression, record.result);

    Ok(Json(CalculateResponse::from(&record)))
}

/// Division by zero echoes the request back next to the message.
fn calculation_error(err: CoreError, request: &CalculationRequest) -> ApiError {
    match err {
        CoreError::DivisionByZero => ApiError::from(err)
            .with_field("operation", request.operation.name())
            .with_field("a", request.a)
            .with_field("b", request.b),
        other => ApiError::from(other),
    }
}
