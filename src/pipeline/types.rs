use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::{ClassificationResult, Logits};
use crate::explanation::{Explanation, Provenance};
use crate::features::{EntityCounts, FeatureSet, Sentiment};
use crate::scoring::{CredibilityScore, ScoreBreakdown};

/// Complete outcome of one analysis, assembled once and never mutated.
///
/// Serializes to the flat record handed to callers; the nested stage outputs are
/// reachable through the accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,

    pub is_fake: bool,
    pub credibility_score: CredibilityScore,
    /// Classifier probability of the chosen label.
    pub model_confidence: f32,

    pub explanation: String,
    pub explanation_provenance: Provenance,
    #[serde(default)]
    pub explanation_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,

    pub sentiment: Sentiment,
    pub is_clickbait: bool,
    pub clickbait_keywords: Vec<String>,
    pub entity_counts: EntityCounts,
    pub entities_available: bool,
    pub word_count: usize,
    pub logits: Logits,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,

    pub score_breakdown: ScoreBreakdown,
}

impl AnalysisResult {
    pub fn assemble(
        classification: ClassificationResult,
        features: FeatureSet,
        score: CredibilityScore,
        breakdown: ScoreBreakdown,
        explanation: Explanation,
    ) -> Self {
        let (prompt_tokens, completion_tokens) = match explanation.usage {
            Some(usage) => (Some(usage.prompt_tokens), Some(usage.completion_tokens)),
            None => (None, None),
        };

        Self {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            is_fake: classification.is_fake(),
            credibility_score: score,
            model_confidence: classification.confidence,
            explanation: explanation.text,
            explanation_provenance: explanation.provenance,
            explanation_factors: explanation.factors,
            suggested_score: explanation.suggested_score,
            llm_model: explanation.model,
            sentiment: features.sentiment,
            is_clickbait: features.clickbait.is_clickbait,
            clickbait_keywords: features.clickbait.keywords,
            entity_counts: features.entities,
            entities_available: features.entities_available,
            word_count: features.word_count,
            logits: classification.logits,
            prompt_tokens,
            completion_tokens,
            score_breakdown: breakdown,
        }
    }

    pub fn is_explanation_generated(&self) -> bool {
        matches!(self.explanation_provenance, Provenance::Generated)
    }
}
