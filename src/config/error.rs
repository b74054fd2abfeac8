//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A label-order list was malformed.
    #[error("invalid label list in {name}: {reason}")]
    InvalidLabels { name: &'static str, reason: String },

    /// Generation service settings failed validation.
    #[error("invalid generation service configuration: {reason}")]
    InvalidGeneration { reason: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (model directories expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
