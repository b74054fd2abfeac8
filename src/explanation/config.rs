use std::time::Duration;

use crate::constants::DEFAULT_SHORT_TEXT_WORDS;

pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_TEMPERATURE: f32 = 0.5;

pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Settings for the OpenAI-compatible chat-completions service.
#[derive(Clone)]
pub struct GenerationConfig {
    pub api_base: String,

    /// Bearer token. Without one no call is attempted.
    pub api_key: Option<String>,

    pub model: String,

    pub timeout: Duration,

    pub temperature: f32,

    pub max_tokens: u32,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl GenerationConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_base.trim().is_empty() {
            return Err("api_base cannot be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Settings for the local template explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackConfig {
    /// Texts with fewer words than this get the "short text" sentence.
    pub short_text_words: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            short_text_words: DEFAULT_SHORT_TEXT_WORDS,
        }
    }
}
