//! History endpoints.
//!
//! `limit` is parsed leniently: missing, non-numeric, zero or negative
//! all mean "everything".

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::info;

use crate::error::ApiError;
use crate::models::{ClearHistoryResponse, DeleteEntryResponse, HistoryResponse};
use crate::AppState;

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<HistoryResponse> {
    let limit = params.get("limit").and_then(|raw| raw.trim().parse::<i64>().ok());

    let (history, total) = state
        .ledger
        .with_ledger(|ledger| (ledger.list(limit), ledger.len()));

    Json(HistoryResponse {
        returned: history.len(),
        history,
        total,
    })
}

/// Non-numeric ids are treated as an unknown route.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteEntryResponse>, ApiError> {
    let id: u64 = raw_id.parse().map_err(|_| ApiError::endpoint_not_found())?;

    let deleted = state.ledger.with_ledger_mut(|ledger| ledger.delete_by_id(id))?;
    info!(id, "History entry deleted");

    Ok(Json(DeleteEntryResponse {
        message: format!("Record with ID {} deleted", id),
        deleted_entry: deleted,
    }))
}

pub async fn clear_history(State(state): State<Arc<AppState>>) -> Json<ClearHistoryResponse> {
    let deleted_count = state.ledger.with_ledger_mut(|ledger| ledger.clear());
    info!(deleted_count, "History cleared");

    Json(ClearHistoryResponse {
        message: format!("History cleared. Deleted records: {}", deleted_count),
        deleted_count,
    })
}
