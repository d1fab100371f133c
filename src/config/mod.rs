//! Application configuration module
//!
//! Configuration is read from environment variables with the `IDEA_INTAKE`
//! prefix; nested values are separated by a double underscore. A `.env`
//! file is honored in development.
//!
//! # Example
//!
//! ```no_run
//! use idea_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod conversation;
mod error;
mod server;
mod storage;

pub use ai::{AiConfig, AiProvider, DEFAULT_MISTRAL_MODEL};
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{LogFormat, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;
use std::time::Duration;

/// Root application configuration
///
/// Every section has defaults; only the AI key must be supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Language model backend (Mistral, OpenAI-compatible, Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Turn budget and question limits
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Session and specification persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `IDEA_INTAKE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `IDEA_INTAKE__AI__PROVIDER=anthropic` -> `ai.provider = anthropic`
    ///
    /// The API key and model also fall back to `MISTRAL_API_KEY` (or the
    /// selected provider's equivalent) and `MODEL_NAME`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("IDEA_INTAKE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.ai.apply_env_fallbacks();
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.server.validate(self.ai.timeout())?;
        self.conversation.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Timeout applied to every HTTP request
    pub fn request_timeout(&self) -> Duration {
        self.server.request_timeout(self.ai.turn_budget())
    }
}
