//! HTTP DTOs for the elicitation endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{FinalizeSpecificationResult, SubmitMessageResult};
use crate::domain::conversation::Question;
use crate::domain::foundation::{SessionId, SessionStatus};
use crate::domain::session::{FailureRecord, Session, TurnRole};
use crate::domain::specification::{Specification, SpecificationDraft};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to send a user message into a session.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitMessageRequest {
    pub content: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: SessionStatus,
}

impl StartSessionResponse {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id: session_id.to_string(),
            status: SessionStatus::Collecting,
        }
    }
}

/// Reply to a submitted message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub reply: String,
    pub status: SessionStatus,
    pub draft: SpecificationDraft,
    pub questions: Vec<Question>,
    pub pending_questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub version: u64,
}

impl From<SubmitMessageResult> for MessageResponse {
    fn from(result: SubmitMessageResult) -> Self {
        Self {
            reply: result.assistant_text,
            status: result.status,
            draft: result.draft,
            questions: result.questions,
            pending_questions: result.pending_questions,
            project_id: result.project_id.map(|id| id.to_string()),
            version: result.version,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: String,
}

/// Full session view.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub status: SessionStatus,
    pub turns: Vec<TurnResponse>,
    pub draft: SpecificationDraft,
    pub pending_questions: Vec<Question>,
    pub clarifying_turns: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id().to_string(),
            status: session.status(),
            turns: session
                .turns()
                .iter()
                .map(|turn| TurnResponse {
                    role: turn.role,
                    content: turn.content.clone(),
                    timestamp: turn.timestamp.as_datetime().to_rfc3339(),
                })
                .collect(),
            draft: session.draft().clone(),
            pending_questions: session.questions().pending().to_vec(),
            clarifying_turns: session.clarifying_turns(),
            failure: session.failure().cloned(),
            project_id: (session.status() == SessionStatus::Ready)
                .then(|| session.project_id())
                .flatten()
                .map(|id| id.to_string()),
            version: session.version(),
            created_at: session.created_at().as_datetime().to_rfc3339(),
            updated_at: session.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizeResponse {
    pub project_id: String,
    pub specification: Specification,
}

impl From<FinalizeSpecificationResult> for FinalizeResponse {
    fn from(result: FinalizeSpecificationResult) -> Self {
        Self {
            project_id: result.project_id.to_string(),
            specification: result.specification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_message_request_deserializes() {
        let req: SubmitMessageRequest =
            serde_json::from_str(r#"{"content": "A todo app"}"#).unwrap();
        assert_eq!(req.content, "A todo app");
    }

    #[test]
    fn session_response_from_fresh_session() {
        let session = Session::new(SessionId::new());
        let response: SessionResponse = session.clone().into();

        assert_eq!(response.id, session.id().to_string());
        assert_eq!(response.status, SessionStatus::Collecting);
        assert!(response.turns.is_empty());
        assert!(response.failure.is_none());
        assert!(response.project_id.is_none());
    }

    #[test]
    fn session_response_serializes_status_in_snake_case() {
        let response: SessionResponse = Session::new(SessionId::new()).into();
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["status"], "collecting");
        assert!(json.get("failure").is_none());
    }
}
