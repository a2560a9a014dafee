//! # Request Validation
//!
//! Turns an untyped `{operation, a, b}` JSON payload into a typed
//! [`CalculationRequest`].
//!
//! ## Rule Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. body is an object?              no  ──► NotAnObject                 │
//! │  2. operation, a, b present?        no  ──► MissingField (first absent) │
//! │  3. a, b numeric or numeric text?   no  ──► InvalidType                 │
//! │  4. operation a canonical name?     no  ──► UnknownOperation + list     │
//! │                                                                         │
//! │  ok ──► CalculationRequest { operation, a, b }                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing rule wins; later rules are not checked.

use serde_json::{Map, Value};

use crate::engine;
use crate::error::{CoreResult, ValidationError};
use crate::number::Number;
use crate::operation::Operation;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Required payload fields, in the order they are checked.
const REQUIRED_FIELDS: [&str; 3] = ["operation", "a", "b"];

/// A validated calculation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationRequest {
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
}

impl CalculationRequest {
    /// Runs the request through the engine and formats the result.
    pub fn evaluate(&self) -> CoreResult<Number> {
        let raw = engine::evaluate(self.operation, self.a, self.b)?;
        Number::from_f64(raw)
    }
}

/// Validates a request payload.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use tally_core::{validation::validate_request, Operation};
///
/// let request = validate_request(&json!({"operation": "Add", "a": "10", "b": 5})).unwrap();
/// assert_eq!(request.operation, Operation::Add);
/// assert_eq!((request.a, request.b), (10.0, 5.0));
/// ```
pub fn validate_request(payload: &Value) -> ValidationResult<CalculationRequest> {
    let body = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    for field in REQUIRED_FIELDS {
        if !body.contains_key(field) {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
    }

    let a = operand(body, "a")?;
    let b = operand(body, "b")?;
    let operation = operation(body)?;

    Ok(CalculationRequest { operation, a, b })
}

/// Coerces a numeric JSON value or numeric string to f64.
fn operand(body: &Map<String, Value>, field: &str) -> ValidationResult<f64> {
    let invalid = || ValidationError::InvalidType {
        field: field.to_string(),
    };

    let value = match body.get(field) {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

fn operation(body: &Map<String, Value>) -> ValidationResult<Operation> {
    let raw = match body.get("operation") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    Operation::from_name(&raw).ok_or_else(|| ValidationError::UnknownOperation {
        operation: raw,
        available: Operation::names(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
