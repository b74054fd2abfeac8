use candle_core::{D, Device};
use std::path::Path;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::types::EntityCounts;
use crate::model::device::select_device;
use crate::model::utils::load_tokenizer_with_truncation;
use crate::model::{BertTokenClassifier, ModelError, check_model_dir, encode_single};

/// Named-entity recognizer reporting counts per category.
pub trait EntityRecognizer: Send + Sync {
    fn count_entities(&self, text: &str) -> Result<EntityCounts, ModelError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Person,
    Organization,
    Location,
    Other,
}

impl EntityKind {
    fn from_tag_type(tag_type: &str) -> Self {
        match tag_type.to_ascii_uppercase().as_str() {
            "PER" | "PERSON" => EntityKind::Person,
            "ORG" | "ORGANIZATION" => EntityKind::Organization,
            "LOC" | "LOCATION" | "GPE" => EntityKind::Location,
            _ => EntityKind::Other,
        }
    }
}

/// Splits `B-PER` / `I-ORG` / `LOC` into an optional prefix and the entity type.
fn split_tag(tag: &str) -> (Option<char>, &str) {
    match tag.split_once(['-', '_']) {
        Some((prefix, rest)) if prefix.len() == 1 => (prefix.chars().next(), rest),
        _ => (None, tag),
    }
}

/// Counts entity spans in a per-token tag sequence.
///
/// A span starts at a `B-` tag, or at any other non-`O` tag whose type differs
/// from the previous token's. Handles both BIO and plain IO tagging schemes.
pub fn count_entity_spans<S: AsRef<str>>(tags: &[S]) -> EntityCounts {
    let mut counts = EntityCounts::default();
    let mut previous: Option<EntityKind> = None;

    for tag in tags {
        let tag = tag.as_ref();
        if tag == "O" || tag.is_empty() {
            previous = None;
            continue;
        }

        let (prefix, tag_type) = split_tag(tag);
        let kind = EntityKind::from_tag_type(tag_type);
        let starts_span = matches!(prefix, Some('B') | Some('b')) || previous != Some(kind);

        if starts_span {
            match kind {
                EntityKind::Person => counts.person += 1,
                EntityKind::Organization => counts.organization += 1,
                EntityKind::Location => counts.location += 1,
                EntityKind::Other => {}
            }
        }
        previous = Some(kind);
    }

    counts
}

/// Keeps the tag of each word's first subword.
///
/// `word_ids` comes from the tokenizer encoding; special tokens carry `None`
/// and are dropped. Continuation pieces are ignored even when tagged `B-*`.
pub fn first_subword_tags<'a, S: AsRef<str>>(
    tags: &'a [S],
    word_ids: &[Option<u32>],
) -> Vec<&'a str> {
    let mut previous_word = None;

    tags.iter()
        .zip(word_ids)
        .filter_map(|(tag, &word_id)| {
            let word_id = word_id?;
            if previous_word == Some(word_id) {
                return None;
            }
            previous_word = Some(word_id);
            Some(tag.as_ref())
        })
        .collect()
}

/// Candle token-classification recognizer over a BERT NER checkpoint.
pub struct BertEntityRecognizer {
    device: Device,
    model: BertTokenClassifier,
    tokenizer: Tokenizer,
    labels: Vec<String>,
}

impl std::fmt::Debug for BertEntityRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEntityRecognizer")
            .field("device", &format!("{:?}", self.device))
            .field("labels", &self.labels)
            .finish()
    }
}

impl BertEntityRecognizer {
    pub fn load(model_path: &Path, max_seq_len: usize) -> Result<Self, ModelError> {
        check_model_dir(model_path)?;

        let device = select_device()?;
        info!(model_path = %model_path.display(), "Loading entity recognizer");

        let model = BertTokenClassifier::load(model_path, &device).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("Failed to load NER model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer_with_truncation(model_path, max_seq_len).map_err(|e| {
            ModelError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let labels = model.head().labels();
        info!(labels = ?labels, "Entity recognizer loaded successfully");

        Ok(Self {
            device,
            model,
            tokenizer,
            labels,
        })
    }
}

impl EntityRecognizer for BertEntityRecognizer {
    fn count_entities(&self, text: &str) -> Result<EntityCounts, ModelError> {
        let input = encode_single(&self.tokenizer, text, &self.device)?;

        let logits = self
            .model
            .forward(&input.input_ids, &input.type_ids, Some(&input.attention_mask))
            .map_err(|e| ModelError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let predicted: Vec<u32> = logits.argmax(D::Minus1)?.squeeze(0)?.to_vec1::<u32>()?;
        let token_tags: Vec<&str> = predicted
            .iter()
            .map(|&idx| self.labels.get(idx as usize).map_or("O", String::as_str))
            .collect();

        let tags = first_subword_tags(&token_tags, input.encoding.get_word_ids());
        let counts = count_entity_spans(&tags);
        debug!(
            person = counts.person,
            organization = counts.organization,
            location = counts.location,
            "Counted entities"
        );

        Ok(counts)
    }
}

/// Fixed-count [`EntityRecognizer`] for tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct MockEntityRecognizer {
    counts: Option<EntityCounts>,
}

#[cfg(any(test, feature = "mock"))]
impl MockEntityRecognizer {
    pub fn with_counts(counts: EntityCounts) -> Self {
        Self {
            counts: Some(counts),
        }
    }

    pub fn failing() -> Self {
        Self { counts: None }
    }
}

#[cfg(any(test, feature = "mock"))]
impl EntityRecognizer for MockEntityRecognizer {
    fn count_entities(&self, _text: &str) -> Result<EntityCounts, ModelError> {
        self.counts.ok_or_else(|| ModelError::InferenceFailed {
            reason: "mock recognizer configured to fail".to_string(),
        })
    }
}
