//! Request and response bodies.
//!
//! Field names are part of the public HTTP contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_core::{CalculationRecord, KeypadSnapshot, Number, Operation};
use uuid::Uuid;

// =============================================================================
// Health & Catalog
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationInfo {
    /// Catalog label, e.g. `"addition"`.
    pub name: String,
    /// Value to send as `operation`, e.g. `"add"`.
    pub operation: Operation,
    pub symbol: String,
    pub description: String,
    pub endpoint: String,
    pub example: Value,
}

impl From<Operation> for OperationInfo {
    fn from(op: Operation) -> Self {
        let (a, b) = op.example_operands();
        OperationInfo {
            name: op.label().to_string(),
            operation: op,
            symbol: op.symbol().to_string(),
            description: op.description().to_string(),
            endpoint: "/api/calculate".to_string(),
            example: serde_json::json!({ "operation": op.name(), "a": a, "b": b }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsResponse {
    pub operations: Vec<OperationInfo>,
    pub total: usize,
}

// =============================================================================
// Calculation & History
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub result: Number,
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
    pub expression: String,
    pub id: u64,
}

impl From<&CalculationRecord> for CalculateResponse {
    fn from(record: &CalculationRecord) -> Self {
        CalculateResponse {
            result: record.result,
            operation: record.operation,
            a: record.a,
            b: record.b,
            expression: record.expression.clone(),
            id: record.id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<CalculationRecord>,
    /// Records in the ledger.
    pub total: usize,
    /// Records in this response.
    pub returned: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    pub message: String,
    pub deleted_entry: CalculationRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub message: String,
    pub deleted_count: usize,
}

// =============================================================================
// Keypad
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPressRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeypadResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub snapshot: KeypadSnapshot,
    /// Engine failure from this key press; the keypad has been reset.
    pub error: Option<String>,
    /// Ledger record written by this key press.
    pub recorded: Option<CalculationRecord>,
}

impl KeypadResponse {
    pub fn new(session_id: Uuid, snapshot: KeypadSnapshot) -> Self {
        KeypadResponse {
            session_id,
            snapshot,
            error: None,
            recorded: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Chat
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}
