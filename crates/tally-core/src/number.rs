//! # Number Module
//!
//! Result values as callers see them.
//!
//! ## Integral Collapse
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  engine result (f64)        Number               JSON / display         │
//! │  ───────────────────        ──────               ──────────────         │
//! │  15.0                  ──►  Integer(15)     ──►  15                     │
//! │  -4.0                  ──►  Integer(-4)     ──►  -4                     │
//! │  6.2                   ──►  Float(6.2)      ──►  6.2                    │
//! │  0.5                   ──►  Float(0.5)      ──►  0.5                    │
//! │  inf / NaN             ──►  NonFiniteResult error                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operands are displayed differently: they stay floats in expressions,
//! so `10 + 5` is recorded as `10.0 + 5.0 = 15` (see [`format_operand`]).

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Largest magnitude below which an integral f64 is rendered as an integer.
///
/// 2^63: beyond it the value no longer fits an i64.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// A finite calculation result.
///
/// Serialised untagged, so `Integer(15)` is the JSON number `15` and
/// `Float(0.5)` is `0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Converts an engine result, collapsing exactly integral values.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::Number;
    ///
    /// assert_eq!(Number::from_f64(15.0).unwrap(), Number::Integer(15));
    /// assert_eq!(Number::from_f64(0.5).unwrap(), Number::Float(0.5));
    /// assert!(Number::from_f64(f64::INFINITY).is_err());
    /// ```
    pub fn from_f64(value: f64) -> CoreResult<Self> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteResult(value));
        }

        if value.fract() == 0.0 && value.abs() < I64_LIMIT {
            Ok(Number::Integer(value as i64))
        } else {
            Ok(Number::Float(value))
        }
    }

    /// Returns the value as f64.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(n) => n as f64,
            Number::Float(x) => x,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Renders an operand the way expressions show it: always with a
/// fractional part (`10.0`, `2.5`, `-3.0`).
pub fn format_operand(value: f64) -> String {
    format!("{:?}", value)
}

// =============================================================================
// Unit Tests
// =============================================================================
