//! Embercache - An in-memory LRU cache server that brokers compute tasks
//!
//! Serves two transports against one shared engine: an HTTP RPC façade and a
//! length-prefixed raw socket protocol.

mod api;
mod cache;
mod config;
mod engine;
mod error;
mod ledger;
mod models;
mod net;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use net::spawn_socket_server;
use tasks::spawn_reclaim_task;

/// Main entry point for the Embercache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache-and-task engine
/// 4. Optionally start the background lease reclaim task
/// 5. Start the raw socket transport
/// 6. Start the HTTP server with the RPC façade
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "embercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Embercache Server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, max_entry_size={}B, http_port={}, tcp_port={}",
        config.capacity, config.max_entry_size_bytes, config.server_port, config.tcp_port
    );

    // Create application state with the shared engine
    let state = AppState::from_config(&config);
    info!("Engine initialized");

    let mut background: Vec<JoinHandle<()>> = Vec::new();

    // Start background lease reclaim when configured
    if config.lease_reclaim_secs > 0 {
        background.push(spawn_reclaim_task(
            Arc::clone(&state.engine),
            config.reclaim_interval_secs,
            config.lease_reclaim_secs,
        ));
        info!(
            "Lease reclaim enabled: threshold {}s",
            config.lease_reclaim_secs
        );
    }

    // Start the raw socket transport
    background.push(spawn_socket_server(
        Arc::clone(&state.engine),
        config.tcp_port,
    ));

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP server on {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(background))
        .await
        .context("HTTP server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the background tasks and allows graceful shutdown.
async fn shutdown_signal(background: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort background tasks
    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");
}
