use axum::Json;
use tally_core::Operation;

use crate::models::{OperationInfo, OperationsResponse};

/// Static catalog of the five operations.
pub async fn list_operations() -> Json<OperationsResponse> {
    let operations: Vec<OperationInfo> = Operation::ALL.into_iter().map(OperationInfo::from).collect();
    let total = operations.len();
    Json(OperationsResponse { operations, total })
}
