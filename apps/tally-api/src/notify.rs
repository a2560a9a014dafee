//! # Calculation Notifications
//!
//! Optional outbound message for every calculation made through the API.
//!
//! ## Delivery Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/calculate                                                    │
//! │        │                                                                │
//! │        ├── append to ledger                                            │
//! │        ├── dispatch() ──► tokio::spawn ──► sink.notify() ──► Telegram  │
//! │        │                                        │                       │
//! │        │                                        └── Err ──► log only   │
//! │        ▼                                                                │
//! │  200 response (never waits for the spawned task)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries and no ordering between notifications.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tally_core::Number;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;

/// One calculation to announce.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub expression: String,
    pub result: Number,
    /// Chat id or other sink-specific address.
    pub destination: String,
}

impl Notification {
    /// Message text, Markdown formatted.
    pub fn text(&self) -> String {
        format!(
            "🧮 *New calculation*\n\n`{}`\n\n*Result:* `{}`",
            self.expression, self.result
        )
    }
}

/// Notification failures. Logged, never returned to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Notification sink misconfigured: {0}")]
    Misconfigured(String),
}

/// Somewhere calculation notifications can be sent.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

// =============================================================================
// Telegram
// =============================================================================

/// Sends notifications through the Telegram bot API `sendMessage` call.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramNotifier {
    pub fn new(api_base: impl Into<String>, bot_token: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(TelegramNotifier {
            client,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, NotifyError> {
        let token = config
            .telegram_bot_token
            .clone()
            .ok_or_else(|| NotifyError::Misconfigured("TELEGRAM_BOT_TOKEN is not set".to_string()))?;

        Self::new(
            config.telegram_api_base.clone(),
            token,
            Duration::from_secs(config.notify_timeout_secs),
        )
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&json!({
                "chat_id": notification.destination,
                "text": notification.text(),
                "parse_mode": "Markdown",
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(destination = %notification.destination, "Notification delivered");
        Ok(())
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Picks the destination: per-request override, then configured default.
pub fn resolve_destination(header_value: Option<&str>, default: Option<&str>) -> Option<String> {
    header_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(default)
        .map(str::to_string)
}

/// Sends a notification on a detached task; failures are only logged.
pub fn dispatch(sink: Arc<dyn NotificationSink>, notification: Notification) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = sink.notify(&notification).await {
            error!(
                error = %e,
                destination = %notification.destination,
                expression = %notification.expression,
                "Failed to send calculation notification"
            );
        }
    })
}

/// Dispatches when a sink is configured and a destination is known.
pub fn dispatch_if_enabled(
    sink: Option<&Arc<dyn NotificationSink>>,
    destination: Option<String>,
    expression: &str,
    result: Number,
) -> Option<JoinHandle<()>> {
    let sink = sink?;
    let Some(destination) = destination else {
        warn!("Notifications enabled but no chat id configured; skipping");
        return None;
    };

    Some(dispatch(
        Arc::clone(sink),
        Notification {
            expression: expression.to_string(),
            result,
            destination,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_destination() {
        assert_eq!(resolve_destination(Some("42"), Some("7")), Some("42".to_string()));
        assert_eq!(resolve_destination(Some("  "), Some("7")), Some("7".to_string()));
        assert_eq!(resolve_destination(None, Some("7")), Some("7".to_string()));
        assert_eq!(resolve_destination(None, None), None);
    }

    #[test]
    fn test_notification_text() {
        let notification = Notification {
            expression: "10.0 + 5.0 = 15".to_string(),
            result: Number::Integer(15),
            destination: "1".to_string(),
        };
        let text = notification.text();
        assert!(text.contains("`10.0 + 5.0 = 15`"));
        assert!(text.ends_with("*Result:* `15`"));
    }

    #[test]
    fn test_send_message_url() {
        let notifier = TelegramNotifier::new("http://localhost:9000", "123:abc", Duration::from_secs(1)).unwrap();
        assert_eq!(notifier.send_message_url(), "http://localhost:9000/bot123:abc/sendMessage");
    }

    #[test]
    fn test_from_config_requires_token() {
        let config = ApiConfig::default();
        assert!(matches!(
            TelegramNotifier::from_config(&config),
            Err(NotifyError::Misconfigured(_))
        ));
    }

    struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn notify(&self, _: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected {
                status: 502,
                body: "bad gateway".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failures() {
        let sink: Arc<dyn NotificationSink> = Arc::new(FailingSink);
        let handle = dispatch_if_enabled(Some(&sink), Some("1".to_string()), "1.0 + 1.0 = 2", Number::Integer(2));
        handle.unwrap().await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_skipped_without_destination() {
        let sink: Arc<dyn NotificationSink> = Arc::new(FailingSink);
        assert!(dispatch_if_enabled(Some(&sink), None, "x", Number::Integer(0)).is_none());
        assert!(dispatch_if_enabled(None, Some("1".to_string()), "x", Number::Integer(0)).is_none());
    }
}
