//! Conversation command and query handlers.
//!
//! Starts sessions, runs elicitation turns, and finalizes specifications.

mod controller;
mod errors;
mod finalize_specification;
mod get_session;
mod start_session;
mod submit_message;

pub use controller::{failure_reason, ConversationController, ConversationSettings, TurnOutcome};
pub use errors::ConversationError;
pub use finalize_specification::{
    FinalizeSpecificationCommand, FinalizeSpecificationHandler, FinalizeSpecificationResult,
};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult};
pub use submit_message::{SubmitMessageCommand, SubmitMessageHandler, SubmitMessageResult};
