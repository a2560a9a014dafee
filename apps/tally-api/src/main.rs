//! # Tally API Server
//!
//! Binary entry point: logging, configuration, listener, graceful shutdown.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  client ───► HTTP (5000) ───► Router ───► tally-core Ledger            │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                             Telegram bot API                            │
//! │                              (optional)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tally_api::{create_router, ApiConfig, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("Starting Tally API server...");

    // Load configuration
    let config = ApiConfig::load().context("Failed to load configuration")?;
    let addr = config.socket_addr();
    info!(
        %addr,
        telegram_enabled = config.telegram_enabled,
        "Configuration loaded"
    );

    // Create shared state
    let state = Arc::new(AppState::from_config(config).context("Failed to initialise notifier")?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
