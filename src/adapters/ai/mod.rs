//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for various LLM providers.
//!
//! ## Available Adapters
//!
//! - `ChatCompletionsProvider` - Mistral and other OpenAI-compatible APIs
//! - `AnthropicProvider` - Anthropic Claude models
//! - `RetryingAIProvider` - Wrapper adding timeouts and bounded retries
//! - `MockAIProvider` - Configurable mock for testing

mod anthropic_provider;
mod chat_completions_provider;
mod mock_provider;
mod retry_provider;
mod status;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use chat_completions_provider::{
    ChatCompletionsConfig, ChatCompletionsProvider, MISTRAL_BASE_URL, OPENAI_BASE_URL,
};
pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_REPLY};
pub use retry_provider::{RetryPolicy, RetryingAIProvider};
