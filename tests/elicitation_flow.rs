//! End-to-end tests for the elicitation flow.
//!
//! Drives `ElicitationContext` with a scripted model and the in-memory
//! store, covering the full collecting → clarifying → ready path plus the
//! ways a session can stop early.

use std::sync::Arc;
use std::time::Duration;

use idea_intake::adapters::ai::{MockAIProvider, MockError, RetryPolicy, RetryingAIProvider};
use idea_intake::adapters::storage::InMemorySpecificationStore;
use idea_intake::adapters::validation::SchemaValidator;
use idea_intake::application::handlers::{ConversationError, ConversationSettings};
use idea_intake::application::ElicitationContext;
use idea_intake::domain::conversation::{FORMAT_REMINDER, REPHRASE_REQUEST};
use idea_intake::domain::foundation::{ProjectId, SessionStatus};
use idea_intake::domain::session::FailureReason;
use idea_intake::domain::specification::ArchitectureStyle;
use idea_intake::ports::{AIError, AIProvider, MessageRole, SpecificationStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

const IDEA_REPLY: &str = r#"A chore tracker, nice.

```json
{"title": "Todo app", "description": "Tracks household chores"}
```"#;

const DETAILS_REPLY: &str = r#"That fills in the rest.

```json
{
  "features": [{"name": "Lists", "description": "Group todos", "priority": "high"}],
  "technologies": [{"name": "Rust", "purpose": "Backend"}],
  "architecture": {
    "style": "monolith",
    "components": [
      {"name": "API", "purpose": "Serves requests", "interactions": ["Database"]},
      {"name": "Database", "purpose": "Stores todos"}
    ]
  }
}
```"#;

struct Fixture {
    store: Arc<InMemorySpecificationStore>,
    context: ElicitationContext,
}

fn fixture_with(provider: Arc<dyn AIProvider>, settings: ConversationSettings) -> Fixture {
    let store = Arc::new(InMemorySpecificationStore::new());
    let context = ElicitationContext::new(
        store.clone(),
        provider,
        Arc::new(SchemaValidator::new()),
        settings,
    );
    Fixture { store, context }
}

fn fixture(mock: &MockAIProvider) -> Fixture {
    fixture_with(Arc::new(mock.clone()), ConversationSettings::default())
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn idea_to_published_specification() {
    let mock = MockAIProvider::new()
        .with_response(IDEA_REPLY)
        .with_response(DETAILS_REPLY);
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();

    let first = fx
        .context
        .submit_message(id, "I want an app that tracks chores")
        .await
        .unwrap();
    assert_eq!(first.status, SessionStatus::Clarifying);
    assert!(!first.questions.is_empty());
    assert!(first.project_id.is_none());

    let second = fx
        .context
        .submit_message(id, "Lists, Rust, one API and a database")
        .await
        .unwrap();
    assert_eq!(second.status, SessionStatus::Ready);
    assert_eq!(second.project_id, Some(ProjectId::from_title("Todo app").unwrap()));
    assert!(second.pending_questions.is_empty());

    let spec = fx
        .store
        .load_specification(&ProjectId::from_title("Todo app").unwrap())
        .await
        .unwrap();
    assert_eq!(spec.title, "Todo app");
    assert_eq!(spec.architecture.style, ArchitectureStyle::Monolith);
    assert_eq!(spec.architecture.components.len(), 2);

    let finalized = fx.context.finalize(id).await.unwrap();
    assert_eq!(finalized.specification, spec);
}

#[tokio::test]
async fn conversation_history_is_replayed_on_every_call() {
    let mock = MockAIProvider::new()
        .with_response(IDEA_REPLY)
        .with_response(DETAILS_REPLY);
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();

    fx.context.submit_message(id, "first message").await.unwrap();
    fx.context.submit_message(id, "second message").await.unwrap();

    let last = mock.last_call().unwrap();
    let roles: Vec<_> = last.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
    );
    assert_eq!(last.messages[0].content, "first message");
    assert_eq!(last.messages[2].content, "second message");
    assert!(last.system_prompt.is_some());
}

#[tokio::test]
async fn ready_session_rejects_further_messages() {
    let mock = MockAIProvider::new()
        .with_response(IDEA_REPLY)
        .with_response(DETAILS_REPLY);
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();
    fx.context.submit_message(id, "idea").await.unwrap();
    fx.context.submit_message(id, "details").await.unwrap();

    let err = fx.context.submit_message(id, "one more thing").await.unwrap_err();

    assert!(matches!(
        err,
        ConversationError::SessionClosed {
            status: SessionStatus::Ready
        }
    ));
    assert_eq!(mock.call_count(), 2);
}

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[tokio::test]
async fn title_without_description_asks_what_it_does() {
    let mock = MockAIProvider::new().with_response(r#"{"title": "Todo app"}"#);
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();

    let result = fx.context.submit_message(id, "a todo app").await.unwrap();

    assert_eq!(result.status, SessionStatus::Collecting);
    assert_eq!(result.questions.len(), 1);
    assert_eq!(result.questions[0].field, "description");
    assert_eq!(result.questions[0].text, "What does Todo app do?");
}

#[tokio::test]
async fn fenced_block_with_prose_is_extracted() {
    let mock = MockAIProvider::new().with_response(
        "Sure, here it is:\n```json\n{\"title\":\"X\",\"description\":\"Y\"}\n```\nAnything else?",
    );
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();

    let result = fx.context.submit_message(id, "X does Y").await.unwrap();

    assert_eq!(result.draft.title(), Some("X"));
    assert_eq!(result.status, SessionStatus::Clarifying);
    assert_eq!(mock.call_count(), 1);

    let session = fx.context.get_session(id).await.unwrap();
    let turn = session.turns().last().unwrap();
    let extraction = turn.extraction().unwrap();
    assert_eq!(
        extraction.candidate,
        Some(serde_json::json!({"title": "X", "description": "Y"}))
    );
}

#[tokio::test]
async fn dangling_interaction_blocks_architecture_and_is_asked_about() {
    let mock = MockAIProvider::new().with_response(IDEA_REPLY).with_response(
        r#"{
          "features": [{"name": "Lists", "description": "Group todos", "priority": "high"}],
          "technologies": [{"name": "Rust", "purpose": "Backend"}],
          "architecture": {
            "style": "monolith",
            "components": [{"name": "API", "purpose": "Serves requests", "interactions": ["Database"]}]
          }
        }"#,
    );
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();
    fx.context.submit_message(id, "idea").await.unwrap();

    let result = fx.context.submit_message(id, "details").await.unwrap();

    assert_eq!(result.status, SessionStatus::Clarifying);
    assert!(result.draft.architecture.is_none());
    assert!(result.draft.features.is_some());
    assert!(result
        .pending_questions
        .iter()
        .any(|q| q.field == "architecture.components[0].interactions[0]"));

    let session = fx.context.get_session(id).await.unwrap();
    let dangling: Vec<_> = session
        .turns()
        .last()
        .unwrap()
        .violations
        .iter()
        .filter(|v| v.path == "architecture.components[0].interactions[0]")
        .collect();
    assert_eq!(dangling.len(), 1);
}

#[tokio::test]
async fn repeated_rate_limits_fail_the_session() {
    let mock = MockAIProvider::new()
        .with_error(MockError::RateLimited { retry_after_secs: None })
        .with_error(MockError::RateLimited { retry_after_secs: None })
        .with_error(MockError::RateLimited { retry_after_secs: None });
    let policy = RetryPolicy::default()
        .with_max_attempts(3)
        .with_base_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5));
    let provider = RetryingAIProvider::new(mock.clone()).with_policy(policy);
    let fx = fixture_with(Arc::new(provider), ConversationSettings::default());
    let id = fx.context.start_session().await.unwrap();

    let err = fx.context.submit_message(id, "an idea").await.unwrap_err();

    match err {
        ConversationError::Backend(AIError::RetriesExhausted { attempts, .. }) => {
            assert_eq!(attempts, 3)
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
    assert_eq!(mock.call_count(), 3);

    let session = fx.context.get_session(id).await.unwrap();
    assert_eq!(session.status(), SessionStatus::Failed);
    assert_eq!(session.failure().unwrap().reason, FailureReason::RateLimited);
}

// =============================================================================
// Re-prompt and Turn Budget
// =============================================================================

#[tokio::test]
async fn unreadable_reply_is_reprompted_once() {
    let mock = MockAIProvider::new()
        .with_response("I'd love to help with that!")
        .with_response(r#"{"title": "Todo app", "description": "Tracks chores"}"#);
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();

    let result = fx.context.submit_message(id, "a todo app").await.unwrap();

    assert_eq!(result.status, SessionStatus::Clarifying);
    assert_eq!(mock.call_count(), 2);
    let retry = mock.last_call().unwrap();
    assert_eq!(retry.messages.last().unwrap().content, FORMAT_REMINDER);
    assert_eq!(retry.temperature, Some(0.1));
}

#[tokio::test]
async fn two_unreadable_replies_ask_the_user_to_rephrase() {
    let mock = MockAIProvider::new()
        .with_response("no structure here")
        .with_response("still nothing");
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();

    let result = fx.context.submit_message(id, "a todo app").await.unwrap();

    assert_eq!(result.assistant_text, REPHRASE_REQUEST);
    assert_eq!(result.status, SessionStatus::Collecting);
    assert!(result.draft.is_empty());
}

#[tokio::test]
async fn exhausted_turn_budget_fails_with_open_questions() {
    let mock = MockAIProvider::new()
        .with_response(IDEA_REPLY)
        .with_response(r#"{"technologies": [{"name": "Rust", "purpose": "Backend"}]}"#);
    let settings = ConversationSettings {
        max_clarifying_turns: 2,
        ..Default::default()
    };
    let fx = fixture_with(Arc::new(mock.clone()), settings);
    let id = fx.context.start_session().await.unwrap();

    let first = fx.context.submit_message(id, "idea").await.unwrap();
    assert_eq!(first.status, SessionStatus::Clarifying);

    let second = fx.context.submit_message(id, "Rust").await.unwrap();
    assert_eq!(second.status, SessionStatus::Failed);

    let session = fx.context.get_session(id).await.unwrap();
    assert_eq!(
        session.failure().unwrap().reason,
        FailureReason::TurnBudgetExceeded
    );
    assert_eq!(session.clarifying_turns(), 2);
    assert!(session.draft().technologies.is_some());
}

#[tokio::test]
async fn null_requirement_lists_do_not_stall_the_session() {
    let reply = r#"{
  "title": "Todo app",
  "description": "Tracks household chores",
  "features": [{"name": "Lists", "description": "Group todos", "priority": "high", "requirements": null}],
  "technologies": [{"name": "Rust", "purpose": "Backend"}],
  "architecture": {"style": "monolith", "components": [{"name": "API", "purpose": "Serves requests"}]}
}"#;
    let mock = (0..6).fold(MockAIProvider::new(), |mock, _| mock.with_response(reply));
    let settings = ConversationSettings {
        max_clarifying_turns: 3,
        ..Default::default()
    };
    let fx = fixture_with(Arc::new(mock.clone()), settings);
    let id = fx.context.start_session().await.unwrap();

    let result = fx.context.submit_message(id, "everything").await.unwrap();

    assert_eq!(result.status, SessionStatus::Ready);
    let spec = fx
        .store
        .load_specification(&ProjectId::from_title("Todo app").unwrap())
        .await
        .unwrap();
    assert!(spec.features[0].requirements.is_empty());
    assert_eq!(mock.call_count(), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_submission_to_one_session_is_rejected() {
    let mock = MockAIProvider::new()
        .with_response(r#"{"title": "Todo app"}"#)
        .with_delay(Duration::from_millis(200));
    let fx = fixture(&mock);
    let id = fx.context.start_session().await.unwrap();

    let context = fx.context.clone();
    let slow = tokio::spawn(async move { context.submit_message(id, "first").await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = fx.context.submit_message(id, "second").await.unwrap_err();
    assert!(matches!(err, ConversationError::SessionBusy(busy) if busy == id));

    let first = slow.await.unwrap().unwrap();
    assert_eq!(first.status, SessionStatus::Collecting);
    assert_eq!(mock.call_count(), 1);

    let session = fx.context.get_session(id).await.unwrap();
    assert_eq!(session.turns().len(), 2);
}

#[tokio::test]
async fn independent_sessions_progress_in_parallel() {
    let mock = MockAIProvider::new()
        .with_delay(Duration::from_millis(50));
    for _ in 0..4 {
        mock.push_response(r#"{"title": "Todo app"}"#);
    }
    let fx = fixture(&mock);

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(fx.context.start_session().await.unwrap());
    }

    let handles: Vec<_> = ids
        .iter()
        .map(|id| {
            let context = fx.context.clone();
            let id = *id;
            tokio::spawn(async move { context.submit_message(id, "todo app").await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.status, SessionStatus::Collecting);
        assert_eq!(result.version, 2);
    }
    assert_eq!(fx.store.session_count().await, 4);
    assert_eq!(mock.call_count(), 4);
}
