use thiserror::Error;

use crate::classifier::ClassifierError;

/// The only failure that aborts an analysis.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },
}

impl From<ClassifierError> for PipelineError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::ModelUnavailable { reason } => {
                PipelineError::ModelUnavailable { reason }
            }
        }
    }
}

/// Input rejected by [`validate_input_length`](super::validate_input_length).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("text too short: {chars} characters, minimum is {min}")]
    TooShort { chars: usize, min: usize },

    #[error("text too long: {chars} characters, maximum is {max}")]
    TooLong { chars: usize, max: usize },
}
