//! HTTP handlers for the elicitation endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_conversation_error, ErrorResponse};
use crate::application::ElicitationContext;
use crate::domain::foundation::SessionId;

use super::dto::{
    FinalizeResponse, MessageResponse, SessionResponse, StartSessionResponse,
    SubmitMessageRequest,
};

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response()
    })
}

/// POST /api/sessions - Start a new elicitation session
pub async fn start_session(State(context): State<ElicitationContext>) -> Response {
    match context.start_session().await {
        Ok(session_id) => (
            StatusCode::CREATED,
            Json(StartSessionResponse::new(session_id)),
        )
            .into_response(),
        Err(e) => handle_conversation_error(e),
    }
}

/// POST /api/sessions/:id/messages - Submit a user message
pub async fn submit_message(
    State(context): State<ElicitationContext>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitMessageRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match context.submit_message(session_id, req.content).await {
        Ok(result) => (StatusCode::OK, Json(MessageResponse::from(result))).into_response(),
        Err(e) => handle_conversation_error(e),
    }
}

/// GET /api/sessions/:id - Get the session with its draft and history
pub async fn get_session(
    State(context): State<ElicitationContext>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match context.get_session(session_id).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(session))).into_response(),
        Err(e) => handle_conversation_error(e),
    }
}

/// POST /api/sessions/:id/finalize - Publish a ready specification
pub async fn finalize_specification(
    State(context): State<ElicitationContext>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match context.finalize(session_id).await {
        Ok(result) => (StatusCode::OK, Json(FinalizeResponse::from(result))).into_response(),
        Err(e) => handle_conversation_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_session_id_is_rejected() {
        let response = parse_session_id("not-a-uuid").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn session_id_round_trips_through_path() {
        let id = SessionId::new();
        assert_eq!(parse_session_id(&id.to_string()).unwrap(), id);
    }
}
