//! Generation service clients.
//!
//! `OpenAiCompatibleClient` talks to any chat-completions endpoint over HTTP.
//! `MockGenerationService` returns canned completions for tests.

use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::config::GenerationConfig;
use super::error::ExplanationError;
use super::types::{Completion, TokenUsage};

#[async_trait]
/// Text completion backend used for generated explanations.
pub trait GenerationService: Send + Sync {
    /// Sends `prompt` as a single user turn and returns the completion.
    async fn complete(&self, prompt: &str) -> Result<Completion, ExplanationError>;

    /// Model identifier requested from the service.
    fn model(&self) -> &str;
}

/// Subset of a chat-completions reply the client reads.
///
/// Only the first choice's content is required. `id`, `created`,
/// `finish_reason` and `usage.total_tokens` vary by provider and are ignored.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiCompatibleClient {
    config: GenerationConfig,
    http: HttpClient,
}

impl OpenAiCompatibleClient {
    /// Fails with [`ExplanationError::NotConfigured`] when no API key is set.
    pub fn new(config: GenerationConfig) -> Result<Self, ExplanationError> {
        if !config.is_configured() {
            return Err(ExplanationError::NotConfigured);
        }

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExplanationError::GenerationService {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Single user turn carrying `prompt`.
    #[allow(deprecated)]
    fn chat_request(&self, prompt: &str) -> Result<CreateChatCompletionRequest, ExplanationError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| ExplanationError::GenerationService {
                reason: format!("failed to build chat message: {}", e),
            })?;

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.as_str())
            .messages([ChatCompletionRequestMessage::User(message)])
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| ExplanationError::GenerationService {
                reason: format!("failed to build chat request: {}", e),
            })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ExplanationError {
        if err.is_timeout() {
            ExplanationError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else {
            ExplanationError::GenerationService {
                reason: err.to_string(),
            }
        }
    }
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extracts the first choice's text and usage from a chat-completions body.
///
/// `fallback_model` is reported when the reply does not name its model.
pub fn completion_from_body(
    body: &str,
    fallback_model: &str,
) -> Result<Completion, ExplanationError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ExplanationError::ResponseParse {
            reason: format!("invalid chat completion response: {}", e),
        })?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ExplanationError::ResponseParse {
            reason: "response has no message content".to_string(),
        })?;

    Ok(Completion {
        text,
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        }),
        model: response
            .model
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| fallback_model.to_string()),
    })
}

#[async_trait]
impl GenerationService for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, ExplanationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ExplanationError::NotConfigured)?;

        let request = self.chat_request(prompt)?;

        let response = self
            .http
            .post(self.config.chat_completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExplanationError::GenerationService {
                reason: format!("status {}: {}", status, detail.trim()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        completion_from_body(&body, &self.config.model)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    enum MockReply {
        Text(String),
        Timeout,
        ServiceError(String),
    }

    /// Canned generation service that records every prompt it receives.
    pub struct MockGenerationService {
        reply: MockReply,
        usage: Option<TokenUsage>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerationService {
        const MODEL: &'static str = "mock-model";

        fn with_reply(reply: MockReply) -> Self {
            Self {
                reply,
                usage: Some(TokenUsage {
                    prompt_tokens: 120,
                    completion_tokens: 48,
                }),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Replies with `text` as the completion body.
        pub fn replying(text: impl Into<String>) -> Self {
            Self::with_reply(MockReply::Text(text.into()))
        }

        pub fn timing_out() -> Self {
            Self::with_reply(MockReply::Timeout)
        }

        pub fn failing(reason: impl Into<String>) -> Self {
            Self::with_reply(MockReply::ServiceError(reason.into()))
        }

        pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
            self.usage = usage;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts
                .lock()
                .map(|p| p.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl GenerationService for MockGenerationService {
        async fn complete(&self, prompt: &str) -> Result<Completion, ExplanationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }

            match &self.reply {
                MockReply::Text(text) => Ok(Completion {
                    text: text.clone(),
                    usage: self.usage,
                    model: Self::MODEL.to_string(),
                }),
                MockReply::Timeout => Err(ExplanationError::Timeout { timeout_secs: 30 }),
                MockReply::ServiceError(reason) => Err(ExplanationError::GenerationService {
                    reason: reason.clone(),
                }),
            }
        }

        fn model(&self) -> &str {
            Self::MODEL
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerationService;
