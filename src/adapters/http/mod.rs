//! HTTP adapter - REST API over the elicitation context.

pub mod conversation;
mod error;
mod health;

pub use conversation::session_router;
pub use error::ErrorResponse;
pub use health::HealthResponse;

use std::time::Duration;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::ElicitationContext;

/// Options for the outer middleware stack.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Allowed origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Builds the full application router with tracing, CORS and timeouts.
pub fn app_router(context: ElicitationContext, options: &HttpOptions) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .merge(session_router())
        .with_state(context)
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors_layer(&options.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::storage::InMemorySpecificationStore;
    use crate::adapters::validation::SchemaValidator;
    use crate::application::handlers::ConversationSettings;
    use crate::ports::ProviderInfo;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn context() -> ElicitationContext {
        let mock = MockAIProvider::new()
            .with_provider_info(ProviderInfo::new("mock", "mock-model"));
        ElicitationContext::new(
            Arc::new(InMemorySpecificationStore::new()),
            Arc::new(mock),
            Arc::new(SchemaValidator::new()),
            ConversationSettings::default(),
        )
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let app = app_router(context(), &HttpOptions::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "mock-model");
    }

    #[tokio::test]
    async fn configured_origin_is_echoed() {
        let options = HttpOptions {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let app = app_router(context(), &options);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }
}
