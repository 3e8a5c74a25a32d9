//! Error types for signal operations.

use thiserror::Error;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors that can occur while configuring or selecting signals.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    /// Invalid waveform parameter.
    #[error("Invalid waveform parameter: {what}")]
    InvalidParam { what: String },

    /// Operator command or mode name that does not map to a mode.
    #[error("Unknown mode: '{input}' (expected n, a or i)")]
    UnknownMode { input: String },

    #[error(transparent)]
    Core(#[from] vs_core::CoreError),
}
