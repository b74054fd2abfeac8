//! Pretrained model plumbing shared by the classifier and feature extractors.
//!
//! - [`bert`] provides candle BERT encoders with sequence and token heads.
//! - [`SequenceModel`] is the seam the classifier and sentiment stages consume:
//!   text in, one logit per label out.

/// BERT encoders with classification heads.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Tokenizer loading and logit helpers.
pub mod utils;


pub use bert::{BertSequenceClassifier, BertTokenClassifier, HeadConfig};
pub use error::ModelError;

use candle_core::{Device, Tensor};
use std::path::Path;
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info};

use device::select_device;
use utils::load_tokenizer_with_truncation;

/// A text classifier producing one raw logit per label.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait SequenceModel: Send + Sync {
    fn logits(&self, text: &str) -> Result<Vec<f32>, ModelError>;

    /// Human-readable identifier used in logs.
    fn name(&self) -> &str;
}

/// Tokenized single-sequence inputs ready for a BERT forward pass.
pub(crate) struct EncodedInput {
    pub input_ids: Tensor,
    pub type_ids: Tensor,
    pub attention_mask: Tensor,
    pub encoding: Encoding,
}

pub(crate) fn encode_single(
    tokenizer: &Tokenizer,
    text: &str,
    device: &Device,
) -> Result<EncodedInput, ModelError> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| ModelError::TokenizationFailed {
            reason: e.to_string(),
        })?;

    let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
    let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

    Ok(EncodedInput {
        input_ids,
        type_ids,
        attention_mask,
        encoding,
    })
}

/// Checks that a HuggingFace model directory has the files the loaders need.
pub(crate) fn check_model_dir(model_path: &Path) -> Result<(), ModelError> {
    if !model_path.exists() {
        return Err(ModelError::ModelNotFound {
            path: model_path.to_path_buf(),
        });
    }

    for required in ["config.json", "model.safetensors", "tokenizer.json"] {
        if !model_path.join(required).exists() {
            return Err(ModelError::MissingFile {
                dir: model_path.to_path_buf(),
                file: required,
            });
        }
    }

    Ok(())
}

/// Candle-backed [`SequenceModel`] over a BERT sequence-classification checkpoint.
pub struct BertSequenceModel {
    name: String,
    device: Device,
    model: BertSequenceClassifier,
    tokenizer: Tokenizer,
}

impl std::fmt::Debug for BertSequenceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertSequenceModel")
            .field("name", &self.name)
            .field("device", &format!("{:?}", self.device))
            .field("labels", &self.model.head().labels())
            .finish()
    }
}

impl BertSequenceModel {
    pub fn load(model_path: &Path, max_seq_len: usize) -> Result<Self, ModelError> {
        check_model_dir(model_path)?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for sequence model");

        info!(model_path = %model_path.display(), "Loading sequence classifier");

        let model = BertSequenceClassifier::load(model_path, &device).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer_with_truncation(model_path, max_seq_len).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!(
            labels = ?model.head().labels(),
            "Sequence classifier loaded successfully"
        );

        Ok(Self {
            name: model_path.display().to_string(),
            device,
            model,
            tokenizer,
        })
    }

    pub fn head(&self) -> &HeadConfig {
        self.model.head()
    }
}

impl SequenceModel for BertSequenceModel {
    fn logits(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let input = encode_single(&self.tokenizer, text, &self.device)?;

        let logits = self
            .model
            .forward(&input.input_ids, &input.type_ids, Some(&input.attention_mask))
            .map_err(|e| ModelError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let logits = logits.flatten_all()?.to_vec1::<f32>()?;

        debug!(
            text_len = text.len(),
            tokens = input.encoding.len(),
            ?logits,
            "Sequence classifier forward pass"
        );

        Ok(logits)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fixed-output [`SequenceModel`] for tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct MockSequenceModel {
    logits: Option<Vec<f32>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockSequenceModel {
    /// Always returns `logits`.
    pub fn with_logits(logits: Vec<f32>) -> Self {
        Self {
            logits: Some(logits),
        }
    }

    /// Always fails inference.
    pub fn failing() -> Self {
        Self { logits: None }
    }
}

#[cfg(any(test, feature = "mock"))]
impl SequenceModel for MockSequenceModel {
    fn logits(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
        self.logits
            .clone()
            .ok_or_else(|| ModelError::InferenceFailed {
                reason: "mock model configured to fail".to_string(),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
