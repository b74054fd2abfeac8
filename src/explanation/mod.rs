//! Explanation generation with a guaranteed fallback.
//!
//! Each request walks a fixed sequence of stages:
//!
//! ```text
//! BuildingPrompt -> CallingService -> Parsed -> Done
//!                                  \-> Failed -> Fallback -> Done
//! ```
//!
//! Exactly one service call is made per request. Any failure on the generated
//! path (no API key, transport error, timeout, bad status, unusable envelope)
//! selects the template explanation from [`fallback_explanation`], so
//! [`ExplanationGenerator::explain`] always returns an [`Explanation`].

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod prompts;
pub mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use client::{GenerationService, OpenAiCompatibleClient, completion_from_body};
#[cfg(any(test, feature = "mock"))]
pub use client::MockGenerationService;
pub use config::{FallbackConfig, GenerationConfig};
pub use envelope::{ExplanationEnvelope, locate_json_span, parse_envelope};
pub use error::ExplanationError;
pub use fallback::fallback_explanation;
pub use prompts::{build_explanation_prompt, displayed_confidence_pct};
pub use types::{Completion, Explanation, Provenance, TokenUsage};

use crate::classifier::ClassificationResult;
use crate::features::FeatureSet;

/// Per-request progress of the explanation generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    BuildingPrompt,
    CallingService,
    Parsed,
    Failed,
    Fallback,
    Done,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStage::BuildingPrompt => "building_prompt",
            GenerationStage::CallingService => "calling_service",
            GenerationStage::Parsed => "parsed",
            GenerationStage::Failed => "failed",
            GenerationStage::Fallback => "fallback",
            GenerationStage::Done => "done",
        }
    }
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces an explanation for each assessment.
#[derive(Clone)]
pub struct ExplanationGenerator {
    service: Option<Arc<dyn GenerationService>>,
    fallback: FallbackConfig,
}

impl ExplanationGenerator {
    pub fn new(service: Option<Arc<dyn GenerationService>>, fallback: FallbackConfig) -> Self {
        Self { service, fallback }
    }

    /// Builds the HTTP-backed generator. Without an API key every request
    /// uses the fallback template.
    pub fn from_config(config: &GenerationConfig, fallback: FallbackConfig) -> Self {
        match OpenAiCompatibleClient::new(config.clone()) {
            Ok(client) => {
                info!(
                    model = %config.model,
                    api_base = %config.api_base,
                    "Generation service configured"
                );
                Self::new(Some(Arc::new(client)), fallback)
            }
            Err(e) => {
                info!(
                    error = %e,
                    "Generation service disabled, explanations use fallback templates"
                );
                Self::new(None, fallback)
            }
        }
    }

    /// Generator that never calls out.
    pub fn fallback_only(fallback: FallbackConfig) -> Self {
        Self::new(None, fallback)
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    pub fn fallback_config(&self) -> &FallbackConfig {
        &self.fallback
    }

    /// Runs the generated path once and reports why it failed, if it did.
    pub async fn attempt(
        &self,
        text: &str,
        classification: &ClassificationResult,
        features: &FeatureSet,
    ) -> Result<Explanation, ExplanationError> {
        let service = self
            .service
            .as_ref()
            .ok_or(ExplanationError::NotConfigured)?;

        debug!(stage = %GenerationStage::BuildingPrompt, "Explanation stage");
        let prompt = build_explanation_prompt(text, classification, features);

        debug!(
            stage = %GenerationStage::CallingService,
            model = service.model(),
            prompt_chars = prompt.chars().count(),
            "Explanation stage"
        );
        let completion = service.complete(&prompt).await?;
        let envelope = parse_envelope(&completion.text)?;

        debug!(
            stage = %GenerationStage::Parsed,
            factors = envelope.factors.len(),
            suggested_score = ?envelope.suggested_score,
            "Explanation stage"
        );

        Ok(Explanation {
            text: envelope.explanation,
            provenance: Provenance::Generated,
            usage: completion.usage,
            factors: envelope.factors,
            suggested_score: envelope.suggested_score,
            model: Some(completion.model),
        })
    }

    /// Template explanation for this verdict and feature set.
    pub fn fallback(
        &self,
        classification: &ClassificationResult,
        features: &FeatureSet,
    ) -> Explanation {
        Explanation::fallback(fallback_explanation(
            classification.label,
            features,
            &self.fallback,
        ))
    }

    /// Always returns an explanation. Generation failures are logged and
    /// replaced by the fallback template.
    pub async fn explain(
        &self,
        text: &str,
        classification: &ClassificationResult,
        features: &FeatureSet,
    ) -> Explanation {
        let explanation = match self.attempt(text, classification, features).await {
            Ok(explanation) => explanation,
            Err(ExplanationError::NotConfigured) => {
                debug!(stage = %GenerationStage::Fallback, "No generation service configured");
                self.fallback(classification, features)
            }
            Err(e) => {
                warn!(
                    stage = %GenerationStage::Failed,
                    error = %e,
                    parse_error = e.is_parse_error(),
                    "Explanation generation failed, using fallback"
                );
                self.fallback(classification, features)
            }
        };

        debug!(
            stage = %GenerationStage::Done,
            provenance = %explanation.provenance,
            "Explanation stage"
        );
        explanation
    }
}

impl std::fmt::Debug for ExplanationGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplanationGenerator")
            .field("has_service", &self.has_service())
            .field("fallback", &self.fallback)
            .finish()
    }
}
