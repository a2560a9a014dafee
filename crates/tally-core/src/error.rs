//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Evaluation and history failures                │
//! │  └── ValidationError  - Malformed {operation, a, b} payloads           │
//! │                                                                         │
//! │  tally-api errors (app crate)                                          │
//! │  └── ApiError         - What HTTP clients see (status + JSON body)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → {"error": "..."}       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is a client-input problem except [`CoreError::NonFiniteResult`],
//! which the API layer reports as a server-side calculation failure.

use thiserror::Error;

use crate::DIVISION_BY_ZERO_MESSAGE;

// =============================================================================
// Core Error
// =============================================================================

/// Core calculator errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Divisor was zero.
    ///
    /// Raised for every dividend, including `0 / 0`.
    #[error("{}", DIVISION_BY_ZERO_MESSAGE)]
    DivisionByZero,

    /// No ledger record carries the requested id.
    #[error("Record with ID {0} not found")]
    RecordNotFound(u64),

    /// The engine produced infinity or NaN.
    ///
    /// ## When This Occurs
    /// - `10 ^ 400` overflows f64
    /// - `-8 ^ 0.5` has no real result
    #[error("Result is not a finite number: {0}")]
    NonFiniteResult(f64),

    /// Operand text typed on the keypad could not be read as a number.
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Request payload validation errors.
///
/// Produced by [`crate::validation::validate_request`] in rule order:
/// missing fields first, then operand types, then the operation name.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Payload is not a JSON object.
    #[error("JSON object body required")]
    NotAnObject,

    /// A required field is absent.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A field is present but has the wrong type.
    #[error("Field \"{field}\" must be a number")]
    InvalidType { field: String },

    /// Operation name is not one of the canonical five.
    #[error("Unknown operation: {operation}")]
    UnknownOperation {
        operation: String,
        available: Vec<String>,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
