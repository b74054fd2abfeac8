//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CREDENCE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::classifier::{ClassifierConfig, LabelOrder};
use crate::constants::{DEFAULT_MAX_SEQ_LEN, DEFAULT_SHORT_TEXT_WORDS};
use crate::explanation::config::{
    DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
use crate::explanation::{FallbackConfig, GenerationConfig};
use crate::features::SentimentLabelMap;

/// Analysis configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CREDENCE_*` overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// Fake/real classifier model directory (BERT + tokenizer).
    pub classifier_path: Option<PathBuf>,

    /// Sentiment model directory. When unset the classifier model is reused.
    pub sentiment_path: Option<PathBuf>,

    /// Token-classification (NER) model directory. When unset entity counts are zero.
    pub ner_path: Option<PathBuf>,

    /// Classifier head index order. Default: `fake,real`.
    pub classifier_labels: LabelOrder,

    /// Sentiment head index order. Default: `negative,positive,neutral`.
    pub sentiment_labels: SentimentLabelMap,

    /// Tokenizer truncation length. Default: `512`.
    pub max_seq_len: usize,

    /// Chat-completions base URL. Default: OpenRouter.
    pub llm_api_base: String,

    /// Bearer token for the generation service. No key, no generated explanations.
    pub llm_api_key: Option<String>,

    pub llm_model: String,

    /// Generation request timeout in seconds. Default: `30`.
    pub llm_timeout_secs: u64,

    pub llm_temperature: f32,

    pub llm_max_tokens: u32,

    /// Word count below which the fallback mentions the text is short. Default: `30`.
    pub short_text_words: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("classifier_path", &self.classifier_path)
            .field("sentiment_path", &self.sentiment_path)
            .field("ner_path", &self.ner_path)
            .field("classifier_labels", &self.classifier_labels)
            .field("sentiment_labels", &self.sentiment_labels)
            .field("max_seq_len", &self.max_seq_len)
            .field("llm_api_base", &self.llm_api_base)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("llm_model", &self.llm_model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("short_text_words", &self.short_text_words)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier_path: None,
            sentiment_path: None,
            ner_path: None,
            classifier_labels: LabelOrder::default(),
            sentiment_labels: SentimentLabelMap::default(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            llm_api_base: DEFAULT_API_BASE.to_string(),
            llm_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_TIMEOUT_SECS,
            llm_temperature: DEFAULT_TEMPERATURE,
            llm_max_tokens: DEFAULT_MAX_TOKENS,
            short_text_words: DEFAULT_SHORT_TEXT_WORDS,
        }
    }
}

impl Config {
    const ENV_CLASSIFIER_PATH: &'static str = "CREDENCE_CLASSIFIER_PATH";
    const ENV_SENTIMENT_PATH: &'static str = "CREDENCE_SENTIMENT_PATH";
    const ENV_NER_PATH: &'static str = "CREDENCE_NER_PATH";
    const ENV_CLASSIFIER_LABELS: &'static str = "CREDENCE_CLASSIFIER_LABELS";
    const ENV_SENTIMENT_LABELS: &'static str = "CREDENCE_SENTIMENT_LABELS";
    const ENV_MAX_SEQ_LEN: &'static str = "CREDENCE_MAX_SEQ_LEN";
    const ENV_LLM_API_BASE: &'static str = "CREDENCE_LLM_API_BASE";
    const ENV_LLM_API_KEY: &'static str = "CREDENCE_LLM_API_KEY";
    const ENV_LLM_API_KEY_FALLBACK: &'static str = "OPENROUTER_API_KEY";
    const ENV_LLM_MODEL: &'static str = "CREDENCE_LLM_MODEL";
    const ENV_LLM_TIMEOUT_SECS: &'static str = "CREDENCE_LLM_TIMEOUT_SECS";
    const ENV_LLM_TEMPERATURE: &'static str = "CREDENCE_LLM_TEMPERATURE";
    const ENV_LLM_MAX_TOKENS: &'static str = "CREDENCE_LLM_MAX_TOKENS";
    const ENV_SHORT_TEXT_WORDS: &'static str = "CREDENCE_SHORT_TEXT_WORDS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let classifier_labels =
            match Self::parse_optional_string_from_env(Self::ENV_CLASSIFIER_LABELS) {
                Some(value) => {
                    LabelOrder::parse(&value).map_err(|reason| ConfigError::InvalidLabels {
                        name: Self::ENV_CLASSIFIER_LABELS,
                        reason,
                    })?
                }
                None => defaults.classifier_labels,
            };

        let sentiment_labels =
            match Self::parse_optional_string_from_env(Self::ENV_SENTIMENT_LABELS) {
                Some(value) => {
                    SentimentLabelMap::parse(&value).map_err(|reason| {
                        ConfigError::InvalidLabels {
                            name: Self::ENV_SENTIMENT_LABELS,
                            reason,
                        }
                    })?
                }
                None => defaults.sentiment_labels,
            };

        let llm_api_key = Self::parse_optional_string_from_env(Self::ENV_LLM_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_LLM_API_KEY_FALLBACK));

        Ok(Self {
            classifier_path: Self::parse_optional_path_from_env(Self::ENV_CLASSIFIER_PATH),
            sentiment_path: Self::parse_optional_path_from_env(Self::ENV_SENTIMENT_PATH),
            ner_path: Self::parse_optional_path_from_env(Self::ENV_NER_PATH),
            classifier_labels,
            sentiment_labels,
            max_seq_len: Self::parse_number_from_env(Self::ENV_MAX_SEQ_LEN, defaults.max_seq_len)?,
            llm_api_base: Self::parse_string_from_env(
                Self::ENV_LLM_API_BASE,
                defaults.llm_api_base,
            ),
            llm_api_key,
            llm_model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model),
            llm_timeout_secs: Self::parse_number_from_env(
                Self::ENV_LLM_TIMEOUT_SECS,
                defaults.llm_timeout_secs,
            )?,
            llm_temperature: Self::parse_number_from_env(
                Self::ENV_LLM_TEMPERATURE,
                defaults.llm_temperature,
            )?,
            llm_max_tokens: Self::parse_number_from_env(
                Self::ENV_LLM_MAX_TOKENS,
                defaults.llm_max_tokens,
            )?,
            short_text_words: Self::parse_number_from_env(
                Self::ENV_SHORT_TEXT_WORDS,
                defaults.short_text_words,
            )?,
        })
    }

    /// Validates paths and basic invariants. Model directories are optional,
    /// but when set they must exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.classifier_path, &self.sentiment_path, &self.ner_path]
            .into_iter()
            .flatten()
        {
            Self::validate_model_dir(path)?;
        }

        if self.classifier_labels.fake_index == self.classifier_labels.real_index {
            return Err(ConfigError::InvalidLabels {
                name: Self::ENV_CLASSIFIER_LABELS,
                reason: "fake and real must use different indices".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_SEQ_LEN,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        self.generation_config()
            .validate()
            .map_err(|reason| ConfigError::InvalidGeneration { reason })?;

        Ok(())
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            model_path: self.classifier_path.clone(),
            labels: self.classifier_labels,
            max_seq_len: self.max_seq_len,
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            api_base: self.llm_api_base.clone(),
            api_key: self.llm_api_key.clone(),
            model: self.llm_model.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
            temperature: self.llm_temperature,
            max_tokens: self.llm_max_tokens,
        }
    }

    pub fn fallback_config(&self) -> FallbackConfig {
        FallbackConfig {
            short_text_words: self.short_text_words,
        }
    }

    fn validate_model_dir(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name: var_name,
                reason: e.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }
}
