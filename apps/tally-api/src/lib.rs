//! # Tally API
//!
//! HTTP service exposing the calculator: JSON evaluation, history,
//! keypad sessions and a chat endpoint, all writing to one shared ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally API Server                               │
//! │                                                                         │
//! │  client ──► CORS ──► Trace ──► X-API-Key ──► handler ──► tally-core    │
//! │                                                 │                       │
//! │                                                 └──► Telegram (async)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - Environment-driven [`ApiConfig`]
//! - [`state`] - [`AppState`] and its mutex-guarded parts
//! - [`auth`] - `X-API-Key` middleware
//! - [`routes`] - Router and handlers
//! - [`notify`] - Fire-and-forget calculation notifications
//! - [`error`] - [`ApiError`] and its HTTP mapping

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
