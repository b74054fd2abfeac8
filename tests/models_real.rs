//! Analyses against real checkpoints.
//!
//! Run with `CREDENCE_CLASSIFIER_PATH` (and optionally `CREDENCE_SENTIMENT_PATH`,
//! `CREDENCE_NER_PATH`) pointing at HuggingFace-layout model directories:
//!
//! ```text
//! cargo test --test models_real -- --ignored
//! ```

mod common;

use credence::{AnalysisPipeline, AppContext, Config, MAX_CREDIBILITY_SCORE, MIN_CREDIBILITY_SCORE};

use common::{CLICKBAIT_TEXT, NEUTRAL_TEXT};

fn real_context() -> Option<AppContext> {
    let config = Config::from_env().expect("Failed to read config");
    if config.classifier_path.is_none() {
        println!("> CREDENCE_CLASSIFIER_PATH not set, skipping");
        return None;
    }
    config.validate().expect("Invalid config");

    let context = AppContext::from_config(&config);
    assert!(context.health().classifier_loaded, "Classifier failed to load");
    Some(context)
}

#[tokio::test]
#[ignore]
async fn test_real_classifier_scores_are_bounded() {
    let Some(context) = real_context() else {
        return;
    };
    let pipeline = AnalysisPipeline::new(context);

    for text in [CLICKBAIT_TEXT, NEUTRAL_TEXT] {
        let result = pipeline.analyze(text).await.expect("Analysis failed");
        let score = result.credibility_score.value();

        println!(
            "> is_fake={} confidence={:.3} score={} provenance={}",
            result.is_fake, result.model_confidence, score, result.explanation_provenance
        );

        assert!((MIN_CREDIBILITY_SCORE..=MAX_CREDIBILITY_SCORE).contains(&score));
        assert!((0.0..=1.0).contains(&result.model_confidence));
        assert!(result.logits.fake.is_finite() && result.logits.real.is_finite());
        assert!(!result.explanation.is_empty());
    }
}

#[tokio::test]
#[ignore]
async fn test_real_classifier_is_deterministic() {
    let Some(context) = real_context() else {
        return;
    };
    let pipeline = AnalysisPipeline::new(context);

    let a = pipeline.analyze(NEUTRAL_TEXT).await.expect("Analysis failed");
    let b = pipeline.analyze(NEUTRAL_TEXT).await.expect("Analysis failed");

    assert_eq!(a.is_fake, b.is_fake);
    assert_eq!(a.logits, b.logits);
    assert_eq!(a.score_breakdown.base, b.score_breakdown.base);
}
