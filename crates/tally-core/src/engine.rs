//! # Arithmetic Engine
//!
//! Five pure binary operations over IEEE-754 doubles.
//!
//! The engine has exactly one domain error: a zero divisor. Everything
//! else, including overflow to infinity, is returned as the raw f64 and
//! left to the caller; [`crate::number::Number::from_f64`] is where
//! non-finite results get rejected.

use crate::error::{CoreError, CoreResult};
use crate::operation::Operation;

/// Evaluates `a op b`.
///
/// ## Rules
/// - `Divide` fails with [`CoreError::DivisionByZero`] when `b == 0`,
///   whatever the sign or value of `a` (`-0.0` counts as zero)
/// - `Power` accepts negative and fractional exponents; any base raised
///   to `0` is `1`, including `0 ^ 0`
///
/// ## Example
/// ```rust
/// use tally_core::{engine::evaluate, Operation, CoreError};
///
/// assert_eq!(evaluate(Operation::Power, 2.0, -1.0), Ok(0.5));
/// assert_eq!(evaluate(Operation::Divide, 0.0, 0.0), Err(CoreError::DivisionByZero));
/// ```
pub fn evaluate(op: Operation, a: f64, b: f64) -> CoreResult<f64> {
    match op {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide => {
            if b == 0.0 {
                return Err(CoreError::DivisionByZero);
            }
            Ok(a / b)
        }
        Operation::Power => Ok(a.powf(b)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
