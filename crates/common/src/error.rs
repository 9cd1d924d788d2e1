//! Error types shared across Vigil crates.

use std::path::PathBuf;

/// Top-level error type for Vigil operations.
///
/// Steady-state frame processing never produces one of these; they come
/// from construction, configuration, and file handling.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VigilError.
pub type VigilResult<T> = Result<T, VigilError>;

impl VigilError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error was raised by configuration validation.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
