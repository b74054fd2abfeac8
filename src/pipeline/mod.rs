//! Orchestrates one analysis: classify, extract features, score, explain, assemble.
//!
//! Stages run sequentially because each consumes the previous stage's output.
//! Only an unavailable classifier aborts a request; missing entity recognition
//! and explanation failures degrade in place.

pub mod error;
pub mod types;


pub use error::{InputError, PipelineError};
pub use types::AnalysisResult;

use tracing::{Span, debug, info, instrument};

use crate::classifier::ClassificationResult;
use crate::constants::{MAX_INPUT_CHARS, MIN_INPUT_CHARS};
use crate::context::AppContext;
use crate::features::FeatureSet;
use crate::scoring::synthesize;

/// Checks the accepted input length (in characters) for callers that expose
/// the pipeline to untrusted text. [`AnalysisPipeline::analyze`] does not
/// enforce it.
pub fn validate_input_length(text: &str) -> Result<(), InputError> {
    let chars = text.chars().count();
    if chars < MIN_INPUT_CHARS {
        return Err(InputError::TooShort {
            chars,
            min: MIN_INPUT_CHARS,
        });
    }
    if chars > MAX_INPUT_CHARS {
        return Err(InputError::TooLong {
            chars,
            max: MAX_INPUT_CHARS,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    context: AppContext,
}

impl AnalysisPipeline {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Classification and feature extraction run on tokio's blocking pool.
    /// Only the explanation call is awaited on the runtime itself.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, PipelineError> {
        let (classification, features) = self.run_models(text).await?;
        let (score, breakdown) = synthesize(&classification, &features);

        debug!(
            label = %classification.label,
            score = score.value(),
            raw_score = breakdown.raw(),
            clamped = breakdown.was_clamped(),
            "Score synthesized"
        );

        let explanation = self
            .context
            .explainer()
            .explain(text, &classification, &features)
            .await;

        let result =
            AnalysisResult::assemble(classification, features, score, breakdown, explanation);

        info!(
            analysis_id = %result.analysis_id,
            is_fake = result.is_fake,
            credibility_score = result.credibility_score.value(),
            provenance = %result.explanation_provenance,
            "Analysis complete"
        );

        Ok(result)
    }

    async fn run_models(
        &self,
        text: &str,
    ) -> Result<(ClassificationResult, FeatureSet), PipelineError> {
        let context = self.context.clone();
        let text = text.to_owned();
        let span = Span::current();

        tokio::task::spawn_blocking(move || {
            span.in_scope(|| {
                let classification = context.classifier().classify(&text)?;
                let features = context.features().extract(&text);
                Ok::<_, PipelineError>((classification, features))
            })
        })
        .await
        .map_err(|e| PipelineError::ModelUnavailable {
            reason: format!("inference task failed: {}", e),
        })?
    }
}
