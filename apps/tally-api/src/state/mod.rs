//! # State Module
//!
//! Shared state for the HTTP service.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Arc<AppState> (axum State)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │          │                  │                  │            │           │
//! │          ▼                  ▼                  ▼            ▼           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌──────────┐    │
//! │  │ LedgerState  │  │KeypadSessions│  │  ChatState   │  │ notifier │    │
//! │  │ Arc<Mutex<   │  │ Mutex<Map<   │  │ Mutex<       │  │ Option<  │    │
//! │  │   Ledger>>   │  │  Uuid, ..>>  │  │  ChatMemory> │  │  Arc<dyn>│    │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └──────────┘    │
//! │                                                                         │
//! │  LOCK ORDER: keypad sessions / chat memory first, ledger second.       │
//! │  ApiConfig is read-only after startup.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod chat;
mod keypad;
mod ledger;

use std::sync::Arc;

pub use chat::ChatState;
pub use keypad::{KeyOutcome, KeypadSession, KeypadSessions, DEFAULT_IDLE_TIMEOUT_SECS};
pub use ledger::LedgerState;

use crate::config::ApiConfig;
use crate::notify::{NotificationSink, NotifyError, TelegramNotifier};

/// Shared application state.
pub struct AppState {
    pub config: ApiConfig,
    pub ledger: LedgerState,
    pub keypads: KeypadSessions,
    pub chat: ChatState,
    /// Present only when notifications are enabled.
    pub notifier: Option<Arc<dyn NotificationSink>>,
}

impl AppState {
    /// Builds state from configuration, creating the Telegram notifier
    /// when notifications are enabled.
    pub fn from_config(config: ApiConfig) -> Result<Self, NotifyError> {
        let notifier: Option<Arc<dyn NotificationSink>> = if config.telegram_enabled {
            Some(Arc::new(TelegramNotifier::from_config(&config)?))
        } else {
            None
        };

        Ok(Self::with_notifier(config, notifier))
    }

    /// Builds state with an explicit notification sink.
    pub fn with_notifier(config: ApiConfig, notifier: Option<Arc<dyn NotificationSink>>) -> Self {
        let idle_timeout = chrono::Duration::seconds(config.keypad_idle_timeout_secs);
        AppState {
            config,
            ledger: LedgerState::new(),
            keypads: KeypadSessions::with_idle_timeout(idle_timeout),
            chat: ChatState::new(),
            notifier,
        }
    }
}
