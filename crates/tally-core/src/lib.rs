//! # tally-core: Pure Calculator Logic for Tally
//!
//! This crate is the **heart** of Tally. It contains the arithmetic engine,
//! the calculation history and the input handling for every front-end, as
//! plain data structures with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────────────┐     │
//! │  │   HTTP JSON   │   │  Keypad UI    │   │      Chat text        │     │
//! │  │ {op, a, b}    │   │ 7 + 4 × 2 =   │   │  "10 + 5", /calculate │     │
//! │  └───────┬───────┘   └───────┬───────┘   └───────────┬───────────┘     │
//! │          │                   │                       │                  │
//! │  ┌───────▼───────────────────▼───────────────────────▼───────────────┐ │
//! │  │               ★ tally-core (THIS CRATE) ★                         │ │
//! │  │                                                                    │ │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌────────────┐  │ │
//! │  │   │ validation │  │   keypad   │  │    chat    │  │ operation  │  │ │
//! │  │   │  {op,a,b}  │  │ InputState │  │ ChatMemory │  │  synonyms  │  │ │
//! │  │   └─────┬──────┘  └─────┬──────┘  └─────┬──────┘  └────────────┘  │ │
//! │  │         └───────────────┼───────────────┘                         │ │
//! │  │                         ▼                                          │ │
//! │  │          ┌────────────────────┐     ┌────────────────────┐        │ │
//! │  │          │  engine::evaluate  │────►│   ledger::Ledger   │        │ │
//! │  │          └────────────────────┘     └────────────────────┘        │ │
//! │  │                                                                    │ │
//! │  │   NO I/O • NO NETWORK • NO LOCKS • DETERMINISTIC                   │ │
//! │  └────────────────────────────────────────────────────────────────────┘ │
//! │                                  │                                      │
//! │  ┌───────────────────────────────▼────────────────────────────────────┐ │
//! │  │                 tally-api (HTTP service, axum)                     │ │
//! │  │        mutex-guarded Ledger, keypad sessions, notifications        │ │
//! │  └────────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`operation`] - The five canonical operations and their textual synonyms
//! - [`engine`] - Pure `evaluate(op, a, b)`
//! - [`number`] - Integral-vs-fractional result formatting
//! - [`ledger`] - Append-only, uniquely numbered calculation history
//! - [`keypad`] - Input state machine for button-driven front-ends
//! - [`validation`] - Normalisation of untyped `{operation, a, b}` payloads
//! - [`chat`] - Free-text and slash-command handling for chat front-ends
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{engine, Ledger, Number, Operation};
//!
//! let result = engine::evaluate(Operation::Add, 10.0, 5.0).unwrap();
//! assert_eq!(result, 15.0);
//!
//! let mut ledger = Ledger::new();
//! let record = ledger.append(Operation::Add, 10.0, 5.0, Number::from_f64(result).unwrap());
//! assert_eq!(record.id, 1);
//! assert_eq!(record.expression, "10.0 + 5.0 = 15");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod chat;
pub mod engine;
pub mod error;
pub mod keypad;
pub mod ledger;
pub mod number;
pub mod operation;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use chat::ChatMemory;
pub use error::{CoreError, CoreResult, ValidationError};
pub use keypad::{InputState, Key, KeypadSnapshot};
pub use ledger::{CalculationRecord, Ledger};
pub use number::Number;
pub use operation::Operation;
pub use validation::CalculationRequest;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Message carried by [`CoreError::DivisionByZero`].
pub const DIVISION_BY_ZERO_MESSAGE: &str = "Division by zero is impossible!";

/// Display text of the keypad after a reset.
pub const ZERO_DISPLAY: &str = "0";
