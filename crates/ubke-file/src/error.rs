//! Audio I/O errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading, writing or listing audio files
#[derive(Error, Debug)]
pub enum FileError {
    /// Input path does not exist
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// Directory holds no `.wav` files
    #[error("No .wav files in {0}")]
    NoAudioFiles(PathBuf),

    /// File is not at the configured rate
    #[error("Sample rate mismatch in {path}: found {found}Hz, expected {expected}Hz")]
    SampleRateMismatch {
        /// Offending file
        path: PathBuf,
        /// Rate in the file header
        found: u32,
        /// Configured rate
        expected: u32,
    },

    /// Container or codec error while reading
    #[error("Failed to decode {path}: {message}")]
    Decode {
        /// File being read
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// WAV encoder error
    #[error("Failed to write {path}: {message}")]
    Write {
        /// File being written
        path: PathBuf,
        /// Encoder message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileError {
    pub(crate) fn decode(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result type for audio I/O
pub type FileResult<T> = std::result::Result<T, FileError>;
