//! Application context: every loaded model and client, built once at startup.
//!
//! Nothing in here is mutated after construction. Clones share the same
//! underlying models.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::classifier::{ClassifierAdapter, LabelOrder};
use crate::config::Config;
use crate::explanation::{ExplanationGenerator, FallbackConfig, GenerationService};
use crate::features::{
    BertEntityRecognizer, ClickbaitDetector, EntityRecognizer, FeatureExtractor,
    SentimentAnalyzer, SentimentLabelMap,
};
use crate::model::{BertSequenceModel, SequenceModel};

/// Availability of each collaborator, as reported by `--health-check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub classifier_loaded: bool,
    pub sentiment_available: bool,
    pub entity_recognizer_available: bool,
    pub generation_configured: bool,
}

impl HealthReport {
    /// Only the classifier is required to serve analyses.
    pub fn is_ready(&self) -> bool {
        self.classifier_loaded
    }
}

#[derive(Clone)]
pub struct AppContext {
    classifier: Arc<ClassifierAdapter>,
    features: Arc<FeatureExtractor>,
    explainer: Arc<ExplanationGenerator>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("classifier", &self.classifier)
            .field("features", &self.features)
            .field("explainer", &self.explainer)
            .finish()
    }
}

impl AppContext {
    /// Loads every configured model. Optional collaborators that fail to load
    /// are logged and left out; a missing classifier makes every analysis fail.
    pub fn from_config(config: &Config) -> Self {
        let classifier = ClassifierAdapter::load(&config.classifier_config());

        let sentiment_model: Option<Arc<dyn SequenceModel>> = match &config.sentiment_path {
            Some(path) => match BertSequenceModel::load(path, config.max_seq_len) {
                Ok(model) => {
                    info!(model_path = %path.display(), "Sentiment model ready");
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "Failed to load sentiment model, sentiment will be unknown"
                    );
                    None
                }
            },
            None => classifier.shared_model(),
        };

        let entities: Option<Arc<dyn EntityRecognizer>> = match &config.ner_path {
            Some(path) => match BertEntityRecognizer::load(path, config.max_seq_len) {
                Ok(recognizer) => {
                    info!(model_path = %path.display(), "Entity recognizer ready");
                    Some(Arc::new(recognizer))
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "Failed to load entity recognizer, entity counts degraded"
                    );
                    None
                }
            },
            None => None,
        };

        let features = FeatureExtractor::new(
            SentimentAnalyzer::new(sentiment_model, config.sentiment_labels.clone()),
            ClickbaitDetector::default(),
            entities,
        );

        let explainer = ExplanationGenerator::from_config(
            &config.generation_config(),
            config.fallback_config(),
        );

        Self::new(classifier, features, explainer)
    }

    pub fn new(
        classifier: ClassifierAdapter,
        features: FeatureExtractor,
        explainer: ExplanationGenerator,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            features: Arc::new(features),
            explainer: Arc::new(explainer),
        }
    }

    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    pub fn classifier(&self) -> &ClassifierAdapter {
        &self.classifier
    }

    pub fn features(&self) -> &FeatureExtractor {
        &self.features
    }

    pub fn explainer(&self) -> &ExplanationGenerator {
        &self.explainer
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            classifier_loaded: self.classifier.is_model_loaded(),
            sentiment_available: self.features.sentiment().is_available(),
            entity_recognizer_available: self.features.has_entity_recognizer(),
            generation_configured: self.explainer.has_service(),
        }
    }
}

/// Assembles an [`AppContext`] from already-constructed collaborators.
///
/// Used by tests and embedders that bring their own models.
#[derive(Default)]
pub struct AppContextBuilder {
    classifier_model: Option<Arc<dyn SequenceModel>>,
    classifier_labels: LabelOrder,
    sentiment_model: Option<Arc<dyn SequenceModel>>,
    sentiment_labels: SentimentLabelMap,
    clickbait: Option<ClickbaitDetector>,
    entities: Option<Arc<dyn EntityRecognizer>>,
    generation: Option<Arc<dyn GenerationService>>,
    fallback: FallbackConfig,
}

impl AppContextBuilder {
    pub fn classifier_model(mut self, model: Arc<dyn SequenceModel>) -> Self {
        self.classifier_model = Some(model);
        self
    }

    pub fn classifier_labels(mut self, labels: LabelOrder) -> Self {
        self.classifier_labels = labels;
        self
    }

    /// Without one, sentiment is always [`Sentiment::Unknown`](crate::features::Sentiment::Unknown).
    pub fn sentiment_model(mut self, model: Arc<dyn SequenceModel>) -> Self {
        self.sentiment_model = Some(model);
        self
    }

    pub fn sentiment_labels(mut self, labels: SentimentLabelMap) -> Self {
        self.sentiment_labels = labels;
        self
    }

    pub fn clickbait_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clickbait = Some(ClickbaitDetector::with_phrases(phrases));
        self
    }

    pub fn entity_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.entities = Some(recognizer);
        self
    }

    pub fn generation_service(mut self, service: Arc<dyn GenerationService>) -> Self {
        self.generation = Some(service);
        self
    }

    pub fn fallback_config(mut self, fallback: FallbackConfig) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn build(self) -> AppContext {
        let classifier = match self.classifier_model {
            Some(model) => ClassifierAdapter::new(model, self.classifier_labels),
            None => ClassifierAdapter::unavailable(
                "no classifier model configured",
                self.classifier_labels,
            ),
        };

        let features = FeatureExtractor::new(
            SentimentAnalyzer::new(self.sentiment_model, self.sentiment_labels),
            self.clickbait.unwrap_or_default(),
            self.entities,
        );

        let explainer = ExplanationGenerator::new(self.generation, self.fallback);

        AppContext::new(classifier, features, explainer)
    }
}
