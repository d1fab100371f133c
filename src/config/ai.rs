//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Model used when neither the config nor `MODEL_NAME` names one.
pub const DEFAULT_MISTRAL_MODEL: &str = "mistral-large-latest";

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Backend to talk to
    #[serde(default)]
    pub provider: AiProvider,

    /// API key; falls back to the provider's conventional variable
    pub api_key: Option<Secret<String>>,

    /// Model name; falls back to `MODEL_NAME`, then the provider default
    pub model: Option<String>,

    /// Override for self-hosted or proxied endpoints
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Total attempts for rate-limited or transport failures
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub retry_max_delay_ms: u64,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Mistral,
    OpenAI,
    Anthropic,
}

impl AiProvider {
    /// Environment variable conventionally holding this provider's key
    pub fn key_variable(&self) -> &'static str {
        match self {
            AiProvider::Mistral => "MISTRAL_API_KEY",
            AiProvider::OpenAI => "OPENAI_API_KEY",
            AiProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Mistral => DEFAULT_MISTRAL_MODEL,
            AiProvider::OpenAI => "gpt-4o",
            AiProvider::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

impl AiConfig {
    /// Fills the key and model from the conventional variables when the
    /// prefixed ones were not set.
    pub fn apply_env_fallbacks(&mut self) {
        if !self.has_api_key() {
            if let Ok(key) = std::env::var(self.provider.key_variable()) {
                self.api_key = Some(Secret::new(key));
            }
        }
        if self.model.is_none() {
            self.model = std::env::var("MODEL_NAME").ok().filter(|m| !m.trim().is_empty());
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Configured model, or the provider default
    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    /// Longest one turn can spend on the backend: the first call and the
    /// formatting re-prompt, each with every retry, its backoff and the
    /// largest jitter.
    pub fn turn_budget(&self) -> Duration {
        let backoff: Duration = (1..self.max_attempts)
            .map(|retry| {
                self.retry_base_delay()
                    .saturating_mul(1u32 << (retry - 1).min(16))
                    .min(self.retry_max_delay())
            })
            .sum();
        let per_call = self.timeout().saturating_mul(self.max_attempts) + backoff + backoff / 4;
        per_call.saturating_mul(2)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired(self.provider.key_variable()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(1..=10).contains(&self.max_attempts) {
            return Err(ValidationError::InvalidRetryAttempts);
        }
        if self.retry_base_delay_ms > self.retry_max_delay_ms {
            return Err(ValidationError::InvalidRetryDelays);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            api_key: None,
            model: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            max_attempts: default_attempts(),
            retry_base_delay_ms: default_base_delay(),
            retry_max_delay_ms: default_max_delay(),
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout() -> u64 {
    120
}

fn default_attempts() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    1_000
}

fn default_max_delay() -> u64 {
    30_000
}
