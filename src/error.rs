use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Terminal initialization failed: {0}")]
    Terminal(String),

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;
