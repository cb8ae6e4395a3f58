//! Application builder: wires stores, services, the realtime gateway and
//! the router into a running server.

use std::time::Duration;

use axum::Router;
use tracing::{error, info, warn};

use taskhub_core::config::AppConfig;
use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_database::Stores;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application over already-open stores.
pub fn build_app(config: AppConfig, stores: Stores) -> (Router, AppState) {
    let state = AppState::new(config, stores);
    (build_router(state.clone()), state)
}

/// Runs the TaskHub server until Ctrl+C or SIGTERM.
///
/// On shutdown the gateway closes every live session before the HTTP
/// server drains, and the stores are closed last.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting TaskHub server...");

    let stores = Stores::from_config(&config.database).await?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let (app, state) = build_app(config, stores);
    let reaper = state.gateway.spawn_reaper();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    info!(%addr, "TaskHub server listening");

    let gateway = state.gateway.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            gateway.shutdown();
        })
        .await;

    if tokio::time::timeout(grace, reaper).await.is_err() {
        warn!("Idle reaper did not stop within the grace period");
    }
    state.stores.close().await;

    served.map_err(|e| {
        error!(error = %e, "Server error");
        AppError::with_source(ErrorKind::Internal, "Server error", e)
    })?;

    info!("TaskHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
