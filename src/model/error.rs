use std::path::PathBuf;
use thiserror::Error;

/// Failures loading or running a local checkpoint.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no model directory at {path}")]
    ModelNotFound { path: PathBuf },

    #[error("model directory {dir} is missing {file}")]
    MissingFile { dir: PathBuf, file: &'static str },

    #[error("could not load model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("could not tokenize input: {reason}")]
    TokenizationFailed { reason: String },
}

impl ModelError {
    /// True when the checkpoint never loaded, as opposed to failing on one input.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound { .. } | Self::MissingFile { .. } | Self::ModelLoadFailed { .. }
        )
    }
}

impl From<candle_core::Error> for ModelError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
