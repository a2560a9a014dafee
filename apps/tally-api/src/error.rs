//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally API                              │
//! │                                                                         │
//! │  Handler                                                                │
//! │  Result<Json<T>, ApiError>                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ValidationError ──► CoreError::Validation ──┐                          │
//! │  CoreError::DivisionByZero ──────────────────┤                          │
//! │  CoreError::RecordNotFound ──────────────────┼──► ApiError ──► status  │
//! │  CoreError::NonFiniteResult ─────────────────┤                 + JSON  │
//! │  bad key / bad body / unknown route ─────────┘                          │
//! │                                                                         │
//! │  Every body has an "error" string; some carry extra context fields.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Mapping
//! | Error | Status |
//! |-------|--------|
//! | validation, division by zero, bad JSON, unknown key | 400 |
//! | missing or wrong `X-API-Key` | 401 |
//! | unknown record, session or route | 404 |
//! | non-finite result, anything unexpected | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use tally_core::{CoreError, ValidationError};

/// Endpoints listed in the body of a 404 for an unknown route.
pub const AVAILABLE_ENDPOINTS: [&str; 11] = [
    "GET /api/health",
    "GET /api/operations",
    "POST /api/calculate",
    "GET /api/history",
    "DELETE /api/history/<id>",
    "DELETE /api/history",
    "POST /api/keypad/sessions",
    "GET /api/keypad/sessions/<id>",
    "DELETE /api/keypad/sessions/<id>",
    "POST /api/keypad/sessions/<id>/keys",
    "POST /api/chat",
];

/// Error returned from HTTP handlers.
///
/// ## Serialization
/// ```json
/// {
///   "error": "Division by zero is impossible!",
///   "operation": "divide",
///   "a": 10.0,
///   "b": 0.0
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: Map<String, Value>,
}

impl ApiError {
    /// Creates an error with the given status and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(message.into()));
        ApiError { status, body }
    }

    /// Adds a context field next to `error`.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Missing or wrong API key.
    pub fn unauthorized() -> Self {
        ApiError::new(StatusCode::UNAUTHORIZED, "Invalid or missing API key")
    }

    /// Body absent or not parseable as JSON.
    pub fn json_body_required() -> Self {
        ApiError::bad_request("JSON body required")
    }

    /// Unknown route.
    pub fn endpoint_not_found() -> Self {
        ApiError::not_found("Endpoint not found").with_field("available_endpoints", json!(AVAILABLE_ENDPOINTS))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        self.body.get("error").and_then(Value::as_str).unwrap_or_default()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DivisionByZero => ApiError::bad_request(err.to_string()),
            CoreError::RecordNotFound(_) => ApiError::not_found(err.to_string()),
            CoreError::InvalidOperand(_) => ApiError::bad_request(err.to_string()),
            CoreError::NonFiniteResult(_) => {
                tracing::error!(error = %err, "Calculation produced a non-finite result");
                ApiError::internal(format!("An error occurred during calculation: {}", err))
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownOperation { ref available, .. } => {
                let available = available.clone();
                ApiError::bad_request(err.to_string()).with_field("available_operations", available)
            }
            other => ApiError::bad_request(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Value::Object(self.body))).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status, self.message())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_by_zero_is_client_error() {
        let err = ApiError::from(CoreError::DivisionByZero);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Division by zero is impossible!");
    }

    #[test]
    fn test_record_not_found() {
        let err = ApiError::from(CoreError::RecordNotFound(9));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Record with ID 9 not found");
    }

    #[test]
    fn test_non_finite_is_server_error() {
        let err = ApiError::from(CoreError::NonFiniteResult(f64::INFINITY));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_operation_lists_available() {
        let err = ApiError::from(CoreError::from(ValidationError::UnknownOperation {
            operation: "mod".to_string(),
            available: vec!["add".to_string(), "power".to_string()],
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body["available_operations"], json!(["add", "power"]));
    }

    #[test]
    fn test_with_field() {
        let err = ApiError::bad_request("nope").with_field("a", 1.5);
        assert_eq!(err.body["error"], "nope");
        assert_eq!(err.body["a"], 1.5);
    }
}
