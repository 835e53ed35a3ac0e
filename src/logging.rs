//! File logging. The terminal belongs to the UI, so nothing is written to stdout.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::{ChatError, Result};

const LOG_DIR: &str = "lcb-chat";
const LOG_FILE_PREFIX: &str = "lcb-chat.log";

/// `RUST_LOG` if set, else the configured level
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn default_log_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.data_local_dir().join(LOG_DIR).join("logs"))
}

/// Install the global subscriber. Keep the guard alive until exit or buffered lines are lost.
pub fn init(level: &str, log_file: Option<&Path>) -> Result<WorkerGuard> {
    let (dir, prefix) = match log_file {
        Some(path) => {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_PREFIX)
                .to_string();
            (dir, name)
        }
        None => {
            let dir = default_log_dir()
                .ok_or_else(|| ChatError::Logging("Could not determine log directory".to_string()))?;
            (dir, LOG_FILE_PREFIX.to_string())
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ChatError::Logging(format!("Failed to create {}: {}", dir.display(), e)))?;

    let appender = tracing_appender::rolling::daily(&dir, prefix);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| ChatError::Logging(e.to_string()))?;

    tracing::info!(dir = %dir.display(), "Logging initialized");
    Ok(guard)
}
