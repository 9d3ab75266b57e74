//! Hypertodo HTTP server.
//!
//! Serves the todo list over HTTP with server-rendered htmx fragments.
//!
//! # Usage
//!
//! ```bash
//! HYPERTODO_PORT=8080 METRICS_PORT=9000 cargo run --bin hypertodo
//! ```

use hypertodo_core::InMemoryTodoStore;
use hypertodo_server::config::{Config, DEFAULT_LOG_FILTER};
use hypertodo_web::{AppState, build_router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hypertodo server");

    // Load configuration
    let config = Config::from_env();
    info!(
        address = %config.server.address(),
        metrics_port = ?config.server.metrics_port,
        seed = config.seed_todos,
        secure_cookies = config.secure_cookies,
        "Configuration loaded"
    );

    // Install Prometheus exporter
    if let Some(metrics_address) = config.server.metrics_address() {
        PrometheusBuilder::new()
            .with_http_listener(metrics_address)
            .install()?;
        hypertodo_web::metrics::register_metrics();
        info!(address = %metrics_address, "Prometheus metrics available at /metrics");
    }

    // Setup store
    let store = Arc::new(InMemoryTodoStore::new());
    if config.seed_todos {
        let seeded = hypertodo_server::seed(store.as_ref())?;
        info!(count = seeded, "Store seeded");
    }

    // Build router
    let state = AppState::new(store).with_secure_cookies(config.secure_cookies);
    let app = build_router(state);

    // Create TCP listener
    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown, bounded by the shutdown timeout
    let stopping = Arc::new(Notify::new());
    let signal_stopping = Arc::clone(&stopping);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signal_stopping.notify_one();
        })
        .into_future();

    let timeout = Duration::from_secs(config.server.shutdown_timeout);
    tokio::select! {
        result = server => result?,
        () = async {
            stopping.notified().await;
            tokio::time::sleep(timeout).await;
        } => {
            warn!(timeout_secs = timeout.as_secs(), "Open connections did not drain in time");
        },
    }

    info!("Server stopped");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
