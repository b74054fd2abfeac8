use crate::classifier::{ClassificationResult, CredibilityLabel};
use crate::constants::{
    BASE_SCORE_SCALE, ENTITY_ADJUSTMENT_SCALE, ENTITY_DIVERSITY_SATURATION,
};
use crate::features::{FeatureSet, Sentiment};

use super::types::{CredibilityScore, ScoreBreakdown};

const NEUTRAL_SENTIMENT_BONUS: i32 = 5;
const POLARIZED_SENTIMENT_PENALTY: i32 = -2;
const CLICKBAIT_PENALTY: i32 = -15;
const NO_CLICKBAIT_BONUS: i32 = 5;

fn base_score(label: CredibilityLabel, confidence: f32) -> i32 {
    let confidence = f64::from(confidence).clamp(0.0, 1.0);
    let credible_mass = match label {
        CredibilityLabel::Real => confidence,
        CredibilityLabel::Fake => 1.0 - confidence,
    };
    (credible_mass * BASE_SCORE_SCALE).round() as i32
}

fn sentiment_adjustment(sentiment: Sentiment) -> i32 {
    match sentiment {
        Sentiment::Neutral => NEUTRAL_SENTIMENT_BONUS,
        Sentiment::Positive | Sentiment::Negative => POLARIZED_SENTIMENT_PENALTY,
        Sentiment::Unknown => 0,
    }
}

fn clickbait_adjustment(is_clickbait: bool) -> i32 {
    if is_clickbait {
        CLICKBAIT_PENALTY
    } else {
        NO_CLICKBAIT_BONUS
    }
}

/// Normalized entity diversity in `[0, 1]`.
pub fn entity_diversity(total_entities: u32) -> f64 {
    (f64::from(total_entities) / ENTITY_DIVERSITY_SATURATION).min(1.0)
}

fn entity_adjustment(total_entities: u32) -> i32 {
    (entity_diversity(total_entities) * ENTITY_ADJUSTMENT_SCALE).round() as i32
}

/// Computes each additive term of the score without clamping.
pub fn score_breakdown(
    label: CredibilityLabel,
    confidence: f32,
    sentiment: Sentiment,
    is_clickbait: bool,
    total_entities: u32,
) -> ScoreBreakdown {
    ScoreBreakdown {
        base: base_score(label, confidence),
        sentiment_adjustment: sentiment_adjustment(sentiment),
        clickbait_adjustment: clickbait_adjustment(is_clickbait),
        entity_adjustment: entity_adjustment(total_entities),
    }
}

/// Fuses classification and features into a bounded credibility score.
pub fn synthesize(
    classification: &ClassificationResult,
    features: &FeatureSet,
) -> (CredibilityScore, ScoreBreakdown) {
    let breakdown = score_breakdown(
        classification.label,
        classification.confidence,
        features.sentiment,
        features.is_clickbait(),
        features.total_entities(),
    );
    (CredibilityScore::clamped(breakdown.raw()), breakdown)
}
