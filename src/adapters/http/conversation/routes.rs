//! Route configuration for the elicitation endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{finalize_specification, get_session, start_session, submit_message};
use crate::application::ElicitationContext;

/// Creates the session router.
///
/// Routes:
/// - `POST /api/sessions` - Start a session
/// - `POST /api/sessions/:id/messages` - Submit a message
/// - `GET /api/sessions/:id` - Fetch a session
/// - `POST /api/sessions/:id/finalize` - Publish a ready specification
pub fn session_router() -> Router<ElicitationContext> {
    Router::new()
        .route("/api/sessions", post(start_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/messages", post(submit_message))
        .route("/api/sessions/:id/finalize", post(finalize_specification))
}
