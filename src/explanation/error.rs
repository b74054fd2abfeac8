use thiserror::Error;

/// Recoverable failures of the generated-explanation path.
///
/// None of these escape the explanation generator: each one selects the
/// fallback template instead.
#[derive(Debug, Error)]
pub enum ExplanationError {
    #[error("generation service not configured")]
    NotConfigured,

    #[error("generation service error: {reason}")]
    GenerationService { reason: String },

    #[error("generation service timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("failed to parse generation response: {reason}")]
    ResponseParse { reason: String },
}

impl ExplanationError {
    /// `true` for transport, status, timeout, and configuration failures.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            ExplanationError::NotConfigured
                | ExplanationError::GenerationService { .. }
                | ExplanationError::Timeout { .. }
        )
    }

    /// `true` when a response arrived but its envelope could not be used.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ExplanationError::ResponseParse { .. })
    }
}
