//! Error types for the enhancement core

use thiserror::Error;

/// Enhancement core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown window function name
    #[error("Unknown window function: {0}")]
    UnknownWindow(String),

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yml::Error),

    /// Configuration file could not be read
    #[error("Failed to read configuration {path}: {source}")]
    ConfigRead {
        /// Path that was read
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Buffer size mismatch
    #[error("Buffer size mismatch: expected {expected}, got {got}")]
    BufferMismatch {
        /// Input length
        expected: usize,
        /// Output length
        got: usize,
    },
}

/// Result type for enhancement core operations
pub type CoreResult<T> = Result<T, CoreError>;
