//! AI Provider Port - Interface for language-model backends.
//!
//! The model backend is stateless: every request carries the full ordered
//! conversation plus the sampling parameters, and the response is either
//! text or one of a small set of failure kinds.
//!
//! # Example
//!
//! ```ignore
//! let request = CompletionRequest::new(RequestMetadata::new(session_id))
//!     .with_system_prompt("You are a helpful collaborator")
//!     .with_message(MessageRole::User, "I want to build a todo app")
//!     .with_parameters(&ModelParameters::default());
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::SessionId;

/// Port for language-model backends.
///
/// Implementations translate between provider APIs and these types. They
/// must not retry on their own; retries belong to `RetryingAIProvider`.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            model: "mistral-large-latest".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

/// Request for AI completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Conversation messages, oldest first.
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    /// Overrides the provider's configured model.
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    /// 0.0 = deterministic, 1.0+ = creative.
    pub temperature: Option<f32>,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            model: None,
            max_tokens: None,
            temperature: None,
            metadata,
        }
    }

    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Applies model, temperature and token limit in one go.
    pub fn with_parameters(self, parameters: &ModelParameters) -> Self {
        self.with_model(parameters.model.clone())
            .with_temperature(parameters.temperature)
            .with_max_tokens(parameters.max_tokens)
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    pub session_id: SessionId,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Response from AI completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    /// Hit max_tokens limit.
    Length,
    ContentFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "mistral", "anthropic").
    pub name: String,
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Coarse classification of a failed model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    RateLimited,
    Timeout,
    AuthError,
    ContentFiltered,
    TransportError,
    InvalidRequest,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    #[error("rate limited{}", retry_hint(.retry_after_secs))]
    RateLimited {
        /// Seconds the provider asked us to wait, when it said.
        retry_after_secs: Option<u32>,
    },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    /// Connection errors, 5xx responses and unreadable bodies.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<AIError> },
}

fn retry_hint(retry_after_secs: &Option<u32>) -> String {
    match retry_after_secs {
        Some(secs) => format!(": retry after {secs}s"),
        None => String::new(),
    }
}

impl AIError {
    pub fn rate_limited(retry_after_secs: Option<u32>) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            AIError::RateLimited { .. } => FailureKind::RateLimited,
            AIError::Timeout { .. } => FailureKind::Timeout,
            AIError::AuthenticationFailed => FailureKind::AuthError,
            AIError::ContentFiltered { .. } => FailureKind::ContentFiltered,
            AIError::Transport(_) => FailureKind::TransportError,
            AIError::InvalidRequest(_) => FailureKind::InvalidRequest,
            AIError::RetriesExhausted { last, .. } => last.kind(),
        }
    }

    /// Only rate limits and transport errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. } | AIError::Transport(_)
        )
    }

    pub fn retry_after_secs(&self) -> Option<u32> {
        match self {
            AIError::RateLimited { retry_after_secs } => *retry_after_secs,
            AIError::RetriesExhausted { last, .. } => last.retry_after_secs(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(SessionId::new())
    }

    #[test]
    fn completion_request_builder_works() {
        let parameters = ModelParameters {
            model: "mistral-small".to_string(),
            temperature: 0.2,
            max_tokens: 100,
        };
        let request = CompletionRequest::new(metadata())
            .with_message(MessageRole::User, "Hello")
            .with_system_prompt("Be helpful")
            .with_parameters(&parameters);

        assert_eq!(request.messages, vec![Message::user("Hello")]);
        assert_eq!(request.system_prompt.as_deref(), Some("Be helpful"));
        assert_eq!(request.model.as_deref(), Some("mistral-small"));
        assert_eq!(request.max_tokens, Some(100));
        assert_eq!(request.temperature, Some(0.2));
        assert!(uuid::Uuid::parse_str(&request.metadata.trace_id).is_ok());
    }

    #[test]
    fn default_parameters_target_mistral_large() {
        assert_eq!(ModelParameters::default().model, "mistral-large-latest");
    }

    #[test]
    fn token_usage_calculates_total() {
        assert_eq!(TokenUsage::new(100, 50).total_tokens, 150);
    }

    mod errors {
        use super::*;

        #[test]
        fn only_rate_limit_and_transport_are_retryable() {
            assert!(AIError::rate_limited(None).is_retryable());
            assert!(AIError::transport("reset").is_retryable());
            assert!(!AIError::Timeout { timeout_secs: 5 }.is_retryable());
            assert!(!AIError::AuthenticationFailed.is_retryable());
            assert!(!AIError::content_filtered("policy").is_retryable());
            assert!(!AIError::invalid_request("bad").is_retryable());
        }

        #[test]
        fn exhausted_retries_report_the_last_kind() {
            let err = AIError::RetriesExhausted {
                attempts: 3,
                last: Box::new(AIError::rate_limited(Some(2))),
            };
            assert_eq!(err.kind(), FailureKind::RateLimited);
            assert!(!err.is_retryable());
            assert_eq!(
                err.to_string(),
                "gave up after 3 attempts: rate limited: retry after 2s"
            );
        }

        #[test]
        fn kinds_map_one_to_one() {
            assert_eq!(AIError::AuthenticationFailed.kind(), FailureKind::AuthError);
            assert_eq!(AIError::transport("x").kind(), FailureKind::TransportError);
            assert_eq!(
                AIError::content_filtered("x").kind(),
                FailureKind::ContentFiltered
            );
        }
    }
}
