//! Error types for the sp-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Research error: {0}")]
    Research(String),

    #[error("Failed to read window icon: {path}")]
    IconRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create directory: {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Illegal window lifecycle transition: {from} -> {to}")]
    Lifecycle {
        from: &'static str,
        to: &'static str,
    },

    #[error("Cleanup step '{step}' failed: {message}")]
    Cleanup { step: &'static str, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("GUI error: {0}")]
    Gui(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sp_config::ConfigError> for AppError {
    fn from(err: sp_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<sp_research::ResearchError> for AppError {
    fn from(err: sp_research::ResearchError) -> Self {
        AppError::Research(err.to_string())
    }
}
