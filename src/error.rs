//! Error types for burst-cloud

use thiserror::Error;

/// Main error type for burst-cloud operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("QRNG error: {0}")]
    Qrng(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for burst-cloud operations
pub type Result<T> = std::result::Result<T, Error>;
