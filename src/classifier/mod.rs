//! Binary fake/real classification over a pretrained sequence model.
//!
//! The model is loaded once at startup and shared read-only. A classifier whose
//! model failed to load stays constructible, but every call reports
//! [`ClassifierError::ModelUnavailable`]; that is the only fatal condition in
//! the analysis pipeline.

pub mod config;
pub mod types;


pub use config::{ClassifierConfig, LabelOrder};
pub use types::{ClassificationResult, CredibilityLabel, Logits};

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::model::{BertSequenceModel, SequenceModel};

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier model unavailable: {reason}")]
    ModelUnavailable { reason: String },
}

enum ModelState {
    Ready(Arc<dyn SequenceModel>),
    Unavailable(String),
}

pub struct ClassifierAdapter {
    state: ModelState,
    labels: LabelOrder,
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            ModelState::Ready(model) => format!("ready({})", model.name()),
            ModelState::Unavailable(reason) => format!("unavailable({})", reason),
        };
        f.debug_struct("ClassifierAdapter")
            .field("state", &state)
            .field("labels", &self.labels)
            .finish()
    }
}

impl ClassifierAdapter {
    /// Loads the configured model. Load failures are recorded, not returned.
    pub fn load(config: &ClassifierConfig) -> Self {
        if let Err(reason) = config.validate() {
            error!(reason = %reason, "Invalid classifier configuration");
            return Self::unavailable(reason, config.labels);
        }

        let Some(model_path) = config.model_path.as_ref() else {
            error!("No classifier model path configured");
            return Self::unavailable("no classifier model configured", config.labels);
        };

        match BertSequenceModel::load(model_path, config.max_seq_len) {
            Ok(model) => {
                let labels = model.head().label_count();
                if labels < config.labels.required_logits() {
                    let reason = format!(
                        "classifier head has {} labels, label order needs {}",
                        labels,
                        config.labels.required_logits()
                    );
                    error!(reason = %reason, "Classifier head does not match label order");
                    return Self::unavailable(reason, config.labels);
                }

                info!(model_path = %model_path.display(), "Classifier ready");
                Self::new(Arc::new(model), config.labels)
            }
            Err(e) => {
                error!(error = %e, "Failed to load classifier model");
                Self::unavailable(e.to_string(), config.labels)
            }
        }
    }

    pub fn new(model: Arc<dyn SequenceModel>, labels: LabelOrder) -> Self {
        Self {
            state: ModelState::Ready(model),
            labels,
        }
    }

    pub fn unavailable(reason: impl Into<String>, labels: LabelOrder) -> Self {
        Self {
            state: ModelState::Unavailable(reason.into()),
            labels,
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// The loaded model, for stages that share it (sentiment reuses it by default).
    pub fn shared_model(&self) -> Option<Arc<dyn SequenceModel>> {
        match &self.state {
            ModelState::Ready(model) => Some(Arc::clone(model)),
            ModelState::Unavailable(_) => None,
        }
    }

    pub fn labels(&self) -> LabelOrder {
        self.labels
    }

    pub fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        let model = match &self.state {
            ModelState::Ready(model) => model,
            ModelState::Unavailable(reason) => {
                return Err(ClassifierError::ModelUnavailable {
                    reason: reason.clone(),
                });
            }
        };

        let raw = model
            .logits(text)
            .map_err(|e| ClassifierError::ModelUnavailable {
                reason: e.to_string(),
            })?;

        let (Some(&fake), Some(&real)) = (
            raw.get(self.labels.fake_index),
            raw.get(self.labels.real_index),
        ) else {
            return Err(ClassifierError::ModelUnavailable {
                reason: format!(
                    "classifier produced {} logits, expected at least {}",
                    raw.len(),
                    self.labels.required_logits()
                ),
            });
        };

        if !fake.is_finite() || !real.is_finite() {
            return Err(ClassifierError::ModelUnavailable {
                reason: "classifier produced non-finite logits".to_string(),
            });
        }

        let result = ClassificationResult::from_logits(Logits { fake, real });

        debug!(
            label = %result.label,
            confidence = result.confidence,
            logit_fake = fake,
            logit_real = real,
            "Classified text"
        );

        Ok(result)
    }
}
