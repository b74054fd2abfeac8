//! Credence library crate (used by the binary and integration tests).
//!
//! Assigns a bounded credibility score to a short news snippet by fusing a
//! pretrained fake/real classifier with sentiment, clickbait and entity
//! signals, then explains the verdict through an external generation service
//! with a deterministic fallback.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`AnalysisPipeline`], [`AnalysisResult`], [`PipelineError`] - One analysis per call
//! - [`AppContext`], [`AppContextBuilder`] - Models and clients, built once
//! - [`Config`], [`ConfigError`] - Environment configuration
//!
//! ## Stages
//! - [`ClassifierAdapter`], [`ClassificationResult`] - Fake/real verdict
//! - [`FeatureExtractor`], [`FeatureSet`] - Sentiment, clickbait, entities, length
//! - [`synthesize`], [`CredibilityScore`] - Bounded additive score
//! - [`ExplanationGenerator`], [`Explanation`] - Generated or template rationale
//!
//! ## Models
//! - [`SequenceModel`], [`BertSequenceModel`] - Text to per-label logits
//! - [`EntityRecognizer`], [`BertEntityRecognizer`] - Entity counts
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod context;
pub mod explanation;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod scoring;

pub use classifier::{
    ClassificationResult, ClassifierAdapter, ClassifierConfig, ClassifierError, CredibilityLabel,
    LabelOrder, Logits,
};
pub use config::{Config, ConfigError};
pub use constants::{MAX_CREDIBILITY_SCORE, MIN_CREDIBILITY_SCORE};
pub use context::{AppContext, AppContextBuilder, HealthReport};
#[cfg(any(test, feature = "mock"))]
pub use explanation::MockGenerationService;
pub use explanation::{
    Explanation, ExplanationError, ExplanationGenerator, FallbackConfig, GenerationConfig,
    GenerationService, OpenAiCompatibleClient, Provenance, TokenUsage,
};
#[cfg(any(test, feature = "mock"))]
pub use features::MockEntityRecognizer;
pub use features::{
    BertEntityRecognizer, ClickbaitAnalysis, ClickbaitDetector, EntityCounts, EntityRecognizer,
    FeatureExtractor, FeatureSet, Sentiment, SentimentAnalyzer, SentimentLabelMap,
};
#[cfg(any(test, feature = "mock"))]
pub use model::MockSequenceModel;
pub use model::{BertSequenceModel, ModelError, SequenceModel};
pub use pipeline::{AnalysisPipeline, AnalysisResult, InputError, PipelineError, validate_input_length};
pub use scoring::{CredibilityScore, ScoreBreakdown, synthesize};
