//! Evaluation errors

use std::path::PathBuf;
use thiserror::Error;
use ubke_file::FileError;

/// Errors from metric computation and table I/O
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Metric parameters out of range
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Malformed or non-numeric CSV content
    #[error("CSV error in {path} (line {line}): {message}")]
    Csv {
        /// Table being read
        path: PathBuf,
        /// 1-based source line
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Evaluation config is not valid YAML for `EvalConfig`
    #[error("Failed to parse evaluation config: {0}")]
    ConfigParse(#[from] serde_yml::Error),

    /// Summary serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a clean or enhanced file failed
    #[error("Audio file error: {0}")]
    File(#[from] FileError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for evaluation
pub type MetricsResult<T> = std::result::Result<T, MetricsError>;
