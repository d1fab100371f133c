//! HTTP integration tests over the full application router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use idea_intake::adapters::ai::{MockAIProvider, MockError};
use idea_intake::adapters::http::{app_router, HttpOptions};
use idea_intake::adapters::storage::InMemorySpecificationStore;
use idea_intake::adapters::validation::SchemaValidator;
use idea_intake::application::handlers::ConversationSettings;
use idea_intake::application::ElicitationContext;

fn app(mock: &MockAIProvider) -> Router {
    let context = ElicitationContext::new(
        Arc::new(InMemorySpecificationStore::new()),
        Arc::new(mock.clone()),
        Arc::new(SchemaValidator::new()),
        ConversationSettings::default(),
    );
    app_router(context, &HttpOptions::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn conversation_over_http_reaches_finalize() {
    let mock = MockAIProvider::new()
        .with_response(r#"{"title": "Todo app", "description": "Tracks chores"}"#)
        .with_response(
            r#"{
              "features": [{"name": "Lists", "description": "Group todos", "priority": "low"}],
              "technologies": [{"name": "Rust", "purpose": "Backend"}],
              "architecture": {"style": "monolith", "components": [{"name": "API", "purpose": "Serves requests"}]}
            }"#,
        );
    let app = app(&mock);

    let (status, started) = send(&app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = started["session_id"].as_str().unwrap().to_string();

    let messages = format!("/api/sessions/{id}/messages");
    let (status, first) = send(&app, "POST", &messages, Some(json!({"content": "todo app"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "clarifying");

    let (status, second) = send(&app, "POST", &messages, Some(json!({"content": "details"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["status"], "ready");
    assert_eq!(second["project_id"], "todo_app");

    let (status, session) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["turns"].as_array().unwrap().len(), 4);
    assert_eq!(session["project_id"], "todo_app");

    let (status, finalized) =
        send(&app, "POST", &format!("/api/sessions/{id}/finalize"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finalized["specification"]["features"][0]["priority"], "low");
}

#[tokio::test]
async fn backend_failure_is_reported_and_session_kept() {
    let mock = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
    let app = app(&mock);

    let (_, started) = send(&app, "POST", "/api/sessions", None).await;
    let id = started["session_id"].as_str().unwrap().to_string();

    let (status, error) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/messages"),
        Some(json!({"content": "todo app"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error["code"], "AI_PROVIDER_ERROR");

    let (status, session) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["status"], "failed");
    assert_eq!(session["failure"]["reason"], "AuthError");
}

#[tokio::test]
async fn malformed_session_id_is_bad_request() {
    let app = app(&MockAIProvider::new());

    let (status, error) = send(&app, "GET", "/api/sessions/not-an-id", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "BAD_REQUEST");
}
