pub mod api_contracts;
pub mod config;
pub mod error;
pub mod github_client;
pub mod handlers;
pub mod logging;
pub mod meta_extractor;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_harness;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use config::Config;
use state::AppState;

/// Load configuration, start logging and serve until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(anyhow::Error::msg)?;

    // Dropping the guard stops the file writer; hold it for the life of the server
    let _log_guard = logging::init_logging(&config.log).map_err(anyhow::Error::msg)?;

    info!(version = env!("CARGO_PKG_VERSION"), ?config, "Starting github-file-manager");
    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN is not set; file endpoints will answer 500");
    }
    if config.fixed_repo().is_err() {
        warn!("GITHUB_OWNER/GITHUB_REPO not set; /list-files, /get-file and /update-file are unavailable");
    }

    let bind_addr = config.bind_addr;
    let app = handlers::router(AppState::from_config(config));

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
