//! Idea Intake server entry point.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use idea_intake::adapters::ai::{
    AnthropicConfig, AnthropicProvider, ChatCompletionsConfig, ChatCompletionsProvider,
    RetryPolicy, RetryingAIProvider,
};
use idea_intake::adapters::http::{app_router, HttpOptions};
use idea_intake::adapters::storage::{FileSpecificationStore, InMemorySpecificationStore};
use idea_intake::adapters::validation::SchemaValidator;
use idea_intake::application::handlers::ConversationSettings;
use idea_intake::application::ElicitationContext;
use idea_intake::config::{AiConfig, AiProvider, AppConfig, LogFormat, StorageBackend};
use idea_intake::ports::{AIError, AIProvider, ModelParameters, SpecificationStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let provider = build_provider(&config.ai)?;
    let store = build_store(&config);
    let settings = ConversationSettings {
        parameters: ModelParameters {
            model: config.ai.model_name().to_string(),
            temperature: config.ai.temperature,
            max_tokens: config.ai.max_tokens,
        },
        max_clarifying_turns: config.conversation.max_clarifying_turns,
        questions_per_turn: config.conversation.questions_per_turn,
        reprompt_temperature: config.conversation.reprompt_temperature,
    };

    let context = ElicitationContext::new(store, provider, Arc::new(SchemaValidator::new()), settings);
    let options = HttpOptions {
        cors_origins: config.server.cors_origins(),
        request_timeout: config.request_timeout(),
    };
    let app = app_router(context, &options);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        provider = ?config.ai.provider,
        model = config.ai.model_name(),
        "idea-intake listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.server.log_format == LogFormat::Json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let key = ai
        .api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();
    let policy = RetryPolicy::default()
        .with_max_attempts(ai.max_attempts)
        .with_base_delay(ai.retry_base_delay())
        .with_max_delay(ai.retry_max_delay())
        .with_attempt_timeout(ai.timeout());

    let provider: Arc<dyn AIProvider> = match ai.provider {
        AiProvider::Mistral | AiProvider::OpenAI => {
            let mut chat = match ai.provider {
                AiProvider::OpenAI => ChatCompletionsConfig::openai(key),
                _ => ChatCompletionsConfig::mistral(key),
            }
            .with_model(ai.model_name())
            .with_timeout(ai.timeout());
            if let Some(url) = &ai.base_url {
                chat = chat.with_base_url(url);
            }
            Arc::new(RetryingAIProvider::new(ChatCompletionsProvider::new(chat)?).with_policy(policy))
        }
        AiProvider::Anthropic => {
            let mut anthropic = AnthropicConfig::new(key)
                .with_model(ai.model_name())
                .with_timeout(ai.timeout());
            if let Some(url) = &ai.base_url {
                anthropic = anthropic.with_base_url(url);
            }
            Arc::new(RetryingAIProvider::new(AnthropicProvider::new(anthropic)?).with_policy(policy))
        }
    };
    Ok(provider)
}

fn build_store(config: &AppConfig) -> Arc<dyn SpecificationStore> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; sessions are lost on restart");
            Arc::new(InMemorySpecificationStore::new())
        }
        StorageBackend::File => {
            tracing::info!(data_dir = %config.storage.data_dir.display(), "using file storage");
            Arc::new(FileSpecificationStore::new(&config.storage.data_dir))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
