//! Tracing subscriber setup
//!
//! Console output is text or JSON depending on `LOG_FORMAT`. When `LOG_DIR`
//! is set, JSON lines are also written to a daily-rolling file there. The
//! returned guard must be held for as long as the process logs.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::{LogConfig, LogFormat};

pub const DEFAULT_FILTER: &str = "github_file_manager=info,tower_http=info";
pub const LOG_FILE_PREFIX: &str = "github-file-manager.log";

/// `RUST_LOG` when set and valid, otherwise the crate default
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Non-blocking writer onto a daily-rolling file in `dir`
pub fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard), String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create log directory {}: {}", dir.display(), e))?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, String> {
    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let (writer, guard) = file_writer(Path::new(dir))?;
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = match config.format {
        LogFormat::Text => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| format!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}
