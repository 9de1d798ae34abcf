//! depot-server entry point
//!
//! - Loads `.env` and the environment into [`Config`]
//! - Connects the store (migrations run on connect for PostgreSQL)
//! - Starts the notification worker and the session purge task
//! - Serves the HTTP API until Ctrl-C

use std::time::Duration;

use anyhow::{Context, anyhow};
use depot_server::notify::{NotificationWorker, sink_from_config};
use depot_server::services::account;
use depot_server::utils::logger::init_logger;
use depot_server::{AppState, Config, api};
use tokio_util::sync::CancellationToken;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow!("invalid configuration: {e}"))?;
    init_logger(&config.log_level, config.log_json, config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        store = ?config.store_backend,
        notify = ?config.notify_backend,
        "Starting depot-server"
    );

    let (state, notifications) = AppState::new(&config)
        .await
        .map_err(|e| anyhow!("failed to initialize state: {e}"))?;

    if let Some((username, password)) = &config.bootstrap_admin {
        account::bootstrap_admin(&state, username, password)
            .await
            .map_err(|e| anyhow!("admin bootstrap failed: {}", shared::error::AppError::from(e)))?;
    }

    // Receipt delivery
    let sink = sink_from_config(&config).await;
    let worker = tokio::spawn(NotificationWorker::new(sink).run(notifications));

    // Periodic session cleanup
    let shutdown = CancellationToken::new();
    let sessions = state.memory_sessions.clone();
    let purge_token = shutdown.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            tokio::select! {
                _ = purge_token.cancelled() => break,
                _ = interval.tick() => {
                    let removed = sessions.purge_expired();
                    if removed > 0 {
                        tracing::debug!(removed, "Expired sessions purged");
                    }
                }
            }
        }
    });

    let app = api::build_app(&state);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("depot-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("HTTP server error")?;

    // Dropping the last queue sender lets the worker drain and exit
    drop(state);
    if let Err(e) = worker.await {
        tracing::error!("Notification worker panicked: {e}");
    }

    tracing::info!("depot-server stopped");
    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutdown signal received");
    token.cancel();
}
