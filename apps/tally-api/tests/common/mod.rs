//! Shared helpers for router integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tally_api::notify::{Notification, NotificationSink, NotifyError};
use tally_api::{create_router, ApiConfig, AppState};
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";
pub const DEFAULT_CHAT_ID: &str = "default-chat";

pub fn test_config() -> ApiConfig {
    ApiConfig {
        api_key: API_KEY.to_string(),
        telegram_chat_id: Some(DEFAULT_CHAT_ID.to_string()),
        ..ApiConfig::default()
    }
}

/// Router without notifications.
pub fn app() -> Router {
    app_with_state(AppState::with_notifier(test_config(), None))
}

pub fn app_with_sink(config: ApiConfig, sink: Arc<dyn NotificationSink>) -> Router {
    app_with_state(AppState::with_notifier(config, Some(sink)))
}

pub fn app_with_state(state: AppState) -> Router {
    create_router(Arc::new(state))
}

/// Sends a request with the test API key.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_headers(app, method, uri, body, &[("X-API-Key", API_KEY)]).await
}

pub async fn send_with_headers(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Sink that forwards every notification to a channel.
pub struct RecordingSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl RecordingSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(RecordingSink { tx }), rx)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let _ = self.tx.send(notification.clone());
        Ok(())
    }
}

/// Sink that always fails.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected {
            status: 500,
            body: "telegram is down".to_string(),
        })
    }
}
