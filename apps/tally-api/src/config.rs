//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_IDLE_TIMEOUT_SECS;

/// Default shared secret expected in `X-API-Key`.
pub const DEFAULT_API_KEY: &str = "secret_key_12345";

/// Default Telegram bot API base URL.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address
    pub bind_addr: IpAddr,

    /// HTTP port
    pub port: u16,

    /// Shared secret compared against `X-API-Key`
    pub api_key: String,

    /// Send a notification for every API calculation
    pub telegram_enabled: bool,

    /// Bot token (required when notifications are enabled)
    pub telegram_bot_token: Option<String>,

    /// Fallback destination when a request carries no `X-Telegram-Chat-ID`
    pub telegram_chat_id: Option<String>,

    /// Bot API base URL, without trailing slash
    pub telegram_api_base: String,

    /// Timeout for a single notification call, in seconds
    pub notify_timeout_secs: u64,

    /// Keypad sessions idle longer than this are evicted, in seconds
    pub keypad_idle_timeout_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config = ApiConfig {
            bind_addr: var("BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))?,

            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            api_key: var("CALCULATOR_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string()),

            telegram_enabled: var("TELEGRAM_ENABLED")
                .map(|value| value.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),

            telegram_bot_token: var("TELEGRAM_BOT_TOKEN"),

            telegram_chat_id: var("TELEGRAM_CHAT_ID"),

            telegram_api_base: var("TELEGRAM_API_BASE")
                .map(|base| base.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),

            notify_timeout_secs: var("NOTIFY_TIMEOUT_SECS")
                .unwrap_or_else(|| "10".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NOTIFY_TIMEOUT_SECS".to_string()))?,

            keypad_idle_timeout_secs: var("KEYPAD_IDLE_TIMEOUT_SECS")
                .unwrap_or_else(|| DEFAULT_IDLE_TIMEOUT_SECS.to_string())
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue("KEYPAD_IDLE_TIMEOUT_SECS".to_string()))?,
        };

        if config.telegram_enabled && config.telegram_bot_token.is_none() {
            return Err(ConfigError::MissingRequired("TELEGRAM_BOT_TOKEN".to_string()));
        }

        Ok(config)
    }

    /// Address the server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            api_key: DEFAULT_API_KEY.to_string(),
            telegram_enabled: false,
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            notify_timeout_secs: 10,
            keypad_idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
