use std::sync::Arc;
use tracing::{debug, warn};

use super::types::Sentiment;
use crate::model::SequenceModel;
use crate::model::utils::argmax;

/// Index→label table for a sentiment head.
///
/// The order is a property of the checkpoint, so it is configuration rather than
/// code. The default matches the AraBERT sentiment head the classifier ships with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentLabelMap {
    labels: Vec<Sentiment>,
}

impl Default for SentimentLabelMap {
    fn default() -> Self {
        Self {
            labels: vec![Sentiment::Negative, Sentiment::Positive, Sentiment::Neutral],
        }
    }
}

impl SentimentLabelMap {
    pub fn new(labels: Vec<Sentiment>) -> Self {
        Self { labels }
    }

    /// Parses `"negative,positive,neutral"`-style lists.
    pub fn parse(value: &str) -> Result<Self, String> {
        let labels = value
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Sentiment::from_label(l).ok_or_else(|| format!("unknown sentiment label '{l}'")))
            .collect::<Result<Vec<_>, _>>()?;

        if labels.is_empty() {
            return Err("sentiment label map cannot be empty".to_string());
        }

        Ok(Self { labels })
    }

    /// Maps a head index to a label; out-of-range indices are [`Sentiment::Unknown`].
    pub fn label_for(&self, index: usize) -> Sentiment {
        self.labels.get(index).copied().unwrap_or(Sentiment::Unknown)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub struct SentimentAnalyzer {
    model: Option<Arc<dyn SequenceModel>>,
    labels: SentimentLabelMap,
}

impl std::fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAnalyzer")
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .field("labels", &self.labels)
            .finish()
    }
}

impl SentimentAnalyzer {
    pub fn new(model: Option<Arc<dyn SequenceModel>>, labels: SentimentLabelMap) -> Self {
        Self { model, labels }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn labels(&self) -> &SentimentLabelMap {
        &self.labels
    }

    pub fn analyze(&self, text: &str) -> Sentiment {
        let Some(model) = &self.model else {
            debug!("No sentiment model available");
            return Sentiment::Unknown;
        };

        match model.logits(text) {
            Ok(logits) => {
                let sentiment = argmax(&logits)
                    .map(|idx| self.labels.label_for(idx))
                    .unwrap_or(Sentiment::Unknown);
                debug!(%sentiment, "Sentiment analyzed");
                sentiment
            }
            Err(e) => {
                warn!(error = %e, "Sentiment inference failed, reporting unknown");
                Sentiment::Unknown
            }
        }
    }
}
