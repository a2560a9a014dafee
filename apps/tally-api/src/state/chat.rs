//! # Chat State
//!
//! Per-user chat memory behind a mutex. Lock order: chat, then ledger.

use std::sync::{Mutex, PoisonError};

use tally_core::ChatMemory;

use super::LedgerState;

#[derive(Debug, Default)]
pub struct ChatState {
    memory: Mutex<ChatMemory>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one chat message and returns the reply.
    pub fn handle(&self, user_id: &str, text: &str, ledger: &LedgerState) -> String {
        let mut memory = self.memory.lock().unwrap_or_else(PoisonError::into_inner);
        ledger.with_ledger_mut(|ledger| memory.handle_message(user_id, text, ledger))
    }
}
