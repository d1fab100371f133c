//! Error bodies and status mapping shared by every endpoint.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::{header, HeaderValue, StatusCode};
use serde::Serialize;

use crate::application::handlers::ConversationError;
use crate::ports::FailureKind;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

fn status_for(error: &ConversationError) -> StatusCode {
    match error {
        ConversationError::EmptyMessage => StatusCode::BAD_REQUEST,
        ConversationError::SessionNotFound(_) | ConversationError::SpecificationNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        ConversationError::SessionBusy(_)
        | ConversationError::SessionClosed { .. }
        | ConversationError::NotReady { .. }
        | ConversationError::VersionConflict(_) => StatusCode::CONFLICT,
        ConversationError::Backend(err) => match err.kind() {
            FailureKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FailureKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        },
        ConversationError::Storage(_) | ConversationError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps a handler error onto a status code and JSON body.
pub(crate) fn handle_conversation_error(error: ConversationError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, "request failed");
    }

    let mut body = ErrorResponse::new(error.code().to_string(), error.to_string());
    let retry_after = match &error {
        ConversationError::Backend(err) => err.retry_after_secs(),
        _ => None,
    };
    if let Some(secs) = retry_after {
        body = body.with_details(serde_json::json!({ "retry_after_secs": secs }));
    }

    let mut response = (status, Json(body)).into_response();
    if let Some(secs) = retry_after {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(secs));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, SessionStatus};
    use crate::ports::AIError;

    #[test]
    fn empty_message_maps_to_400() {
        let response = handle_conversation_error(ConversationError::EmptyMessage);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_session_maps_to_404() {
        let response =
            handle_conversation_error(ConversationError::SessionNotFound(SessionId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn busy_and_closed_sessions_map_to_409() {
        let busy = handle_conversation_error(ConversationError::SessionBusy(SessionId::new()));
        assert_eq!(busy.status(), StatusCode::CONFLICT);

        let closed = handle_conversation_error(ConversationError::SessionClosed {
            status: SessionStatus::Ready,
        });
        assert_eq!(closed.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn rate_limit_carries_retry_after() {
        let response = handle_conversation_error(ConversationError::Backend(
            AIError::rate_limited(Some(30)),
        ));
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            &HeaderValue::from(30u32)
        );
    }

    #[test]
    fn other_backend_failures_map_to_502() {
        let response = handle_conversation_error(ConversationError::Backend(
            AIError::AuthenticationFailed,
        ));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn error_response_omits_empty_details() {
        let json = serde_json::to_value(ErrorResponse::bad_request("nope")).unwrap();
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json.get("details").is_none());
    }
}
