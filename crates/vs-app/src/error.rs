//! Error types for the vs-app service layer.

use crate::publisher::ConnectError;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Signal error: {0}")]
    Signal(String),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Failed to install interrupt handler: {0}")]
    InterruptHandler(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for vs-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<vs_config::ConfigError> for AppError {
    fn from(err: vs_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<vs_config::ValidationError> for AppError {
    fn from(err: vs_config::ValidationError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<vs_signal::SignalError> for AppError {
    fn from(err: vs_signal::SignalError) -> Self {
        AppError::Signal(err.to_string())
    }
}

impl From<ctrlc::Error> for AppError {
    fn from(err: ctrlc::Error) -> Self {
        AppError::InterruptHandler(err.to_string())
    }
}
