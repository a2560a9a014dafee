//! # Operation Catalog
//!
//! The five arithmetic operations Tally understands, and the mapping from
//! every accepted spelling to one closed [`Operation`] variant.
//!
//! ## Canonicalisation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Text from a front-end               Canonical variant                  │
//! │  ─────────────────────               ─────────────────                  │
//! │  "add"  "+"                     ──►  Operation::Add       (+)           │
//! │  "subtract"  "-"  "−"           ──►  Operation::Subtract  (-)           │
//! │  "multiply"  "*"  "×"  "x"      ──►  Operation::Multiply  (*)           │
//! │  "divide"  "/"  "÷"  ":"        ──►  Operation::Divide    (/)           │
//! │  "power"  "^"  "**"             ──►  Operation::Power     (^)           │
//! │                                                                         │
//! │  The engine only ever sees the variant, never the text.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The HTTP API is stricter than chat and keypad input: it accepts the
//! canonical *names* only (see [`Operation::from_name`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A binary arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    /// All operations, in catalog order.
    pub const ALL: [Operation; 5] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
    ];

    /// Canonical name used on the wire (`"add"`, `"divide"`, ...).
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
        }
    }

    /// Human label shown in the operations catalog.
    pub const fn label(&self) -> &'static str {
        match self {
            Operation::Add => "addition",
            Operation::Subtract => "subtraction",
            Operation::Multiply => "multiplication",
            Operation::Divide => "division",
            Operation::Power => "power",
        }
    }

    /// Canonical ASCII symbol, used in ledger expressions.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Power => "^",
        }
    }

    /// Symbol used in chat replies.
    pub const fn display_symbol(&self) -> &'static str {
        match self {
            Operation::Multiply => "×",
            Operation::Divide => "÷",
            other => other.symbol(),
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Operation::Add => "Adds two numbers",
            Operation::Subtract => "Subtracts the second number from the first",
            Operation::Multiply => "Multiplies two numbers",
            Operation::Divide => "Divides the first number by the second",
            Operation::Power => "Raises the first number to the power of the second",
        }
    }

    /// Operands used in the catalog's example payload.
    pub const fn example_operands(&self) -> (i64, i64) {
        match self {
            Operation::Power => (2, 3),
            _ => (10, 5),
        }
    }

    /// Canonical names of all operations, in catalog order.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|op| op.name().to_string()).collect()
    }

    /// Looks up an operation by canonical name, ignoring ASCII case.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::Operation;
    ///
    /// assert_eq!(Operation::from_name("DIVIDE"), Some(Operation::Divide));
    /// assert_eq!(Operation::from_name("/"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Looks up an operation by name, symbol, or synonym.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::Operation;
    ///
    /// assert_eq!(Operation::from_token("×"), Some(Operation::Multiply));
    /// assert_eq!(Operation::from_token("**"), Some(Operation::Power));
    /// assert_eq!(Operation::from_token("Add"), Some(Operation::Add));
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(op) = Self::from_name(token) {
            return Some(op);
        }

        match token {
            "+" => Some(Operation::Add),
            "-" | "−" | "–" => Some(Operation::Subtract),
            "*" | "×" | "x" | "X" | "·" => Some(Operation::Multiply),
            "/" | "÷" | ":" => Some(Operation::Divide),
            "^" | "**" => Some(Operation::Power),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when text names no known operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::from_token(s).ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
