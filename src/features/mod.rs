//! Auxiliary linguistic signals: sentiment, clickbait phrasing, entity density, length.
//!
//! Every sub-extractor degrades instead of failing. A missing or broken entity
//! recognizer zero-fills the counts; a missing or broken sentiment model reports
//! [`Sentiment::Unknown`]. Neither stops the pipeline.

pub mod clickbait;
pub mod entities;
pub mod sentiment;
pub mod types;


pub use clickbait::{ClickbaitDetector, DEFAULT_CLICKBAIT_PHRASES};
#[cfg(any(test, feature = "mock"))]
pub use entities::MockEntityRecognizer;
pub use entities::{BertEntityRecognizer, EntityRecognizer, count_entity_spans, first_subword_tags};
pub use sentiment::{SentimentAnalyzer, SentimentLabelMap};
pub use types::{ClickbaitAnalysis, EntityCounts, FeatureSet, Sentiment};

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts whitespace-delimited tokens in the raw text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub struct FeatureExtractor {
    sentiment: SentimentAnalyzer,
    clickbait: ClickbaitDetector,
    entities: Option<Arc<dyn EntityRecognizer>>,
}

impl std::fmt::Debug for FeatureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureExtractor")
            .field("sentiment", &self.sentiment)
            .field("clickbait_phrases", &self.clickbait.phrases().len())
            .field("entities_available", &self.entities.is_some())
            .finish()
    }
}

impl FeatureExtractor {
    pub fn new(
        sentiment: SentimentAnalyzer,
        clickbait: ClickbaitDetector,
        entities: Option<Arc<dyn EntityRecognizer>>,
    ) -> Self {
        if entities.is_none() {
            info!("No entity recognizer available, entity counts will be zero");
        }
        Self {
            sentiment,
            clickbait,
            entities,
        }
    }

    pub fn has_entity_recognizer(&self) -> bool {
        self.entities.is_some()
    }

    pub fn sentiment(&self) -> &SentimentAnalyzer {
        &self.sentiment
    }

    pub fn clickbait(&self) -> &ClickbaitDetector {
        &self.clickbait
    }

    pub fn extract(&self, text: &str) -> FeatureSet {
        let sentiment = self.sentiment.analyze(text);
        let clickbait = self.clickbait.detect(text);
        let (entities, entities_available) = self.count_entities(text);
        let word_count = word_count(text);

        debug!(
            %sentiment,
            is_clickbait = clickbait.is_clickbait,
            clickbait_matches = clickbait.keywords.len(),
            total_entities = entities.total(),
            entities_available,
            word_count,
            "Extracted features"
        );

        FeatureSet {
            sentiment,
            clickbait,
            entities,
            word_count,
            entities_available,
        }
    }

    fn count_entities(&self, text: &str) -> (EntityCounts, bool) {
        let Some(recognizer) = &self.entities else {
            debug!("Entity extraction degraded: recognizer unavailable");
            return (EntityCounts::default(), false);
        };

        match recognizer.count_entities(text) {
            Ok(counts) => (counts, true),
            Err(e) => {
                warn!(error = %e, "Entity extraction degraded: recognizer failed");
                (EntityCounts::default(), false)
            }
        }
    }
}
