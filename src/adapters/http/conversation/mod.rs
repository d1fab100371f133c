//! HTTP adapter for the elicitation endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    FinalizeResponse, MessageResponse, SessionResponse, StartSessionResponse,
    SubmitMessageRequest, TurnResponse,
};
pub use routes::session_router;
