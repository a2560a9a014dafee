//! # Ledger State
//!
//! The process-wide calculation history, shared by every front-end.
//!
//! ## Thread Safety
//! The ledger is wrapped in `Arc<Mutex<T>>`: handlers run concurrently on
//! the tokio runtime and append, delete and clear must never interleave.
//! Reads take the lock too and copy out what they need.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger State Operations                              │
//! │                                                                         │
//! │  Endpoint                  Closure                   Ledger Change      │
//! │  ────────                  ───────                   ─────────────      │
//! │                                                                         │
//! │  POST /api/calculate ────► with_ledger_mut ───────► append()           │
//! │  POST .../keys ──────────► with_ledger_mut ───────► append() (0..2)    │
//! │  POST /api/chat ─────────► with_ledger_mut ───────► append() (0..1)    │
//! │  DELETE /api/history/N ──► with_ledger_mut ───────► delete_by_id()     │
//! │  DELETE /api/history ────► with_ledger_mut ───────► clear()            │
//! │  GET /api/history ───────► with_ledger ───────────► (read only)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tally_core::Ledger;

/// Shared ledger handle.
///
/// A poisoned lock is recovered rather than propagated: every ledger
/// mutation is a single `Vec` operation, so the data is consistent even
/// if a holder panicked.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    ledger: Arc<Mutex<Ledger>>,
}

impl LedgerState {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let total = ledger_state.with_ledger(|ledger| ledger.len());
    /// ```
    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger) -> R,
    {
        let ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&ledger)
    }

    /// Executes a function with write access to the ledger.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let removed = ledger_state.with_ledger_mut(|ledger| ledger.clear());
    /// ```
    pub fn with_ledger_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut ledger)
    }
}
