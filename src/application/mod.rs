//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! `ElicitationContext` bundles the handlers for the inbound adapters.

mod context;
pub mod handlers;
mod session_locks;

pub use context::ElicitationContext;
pub use handlers::{
    ConversationController, ConversationError, ConversationSettings, FinalizeSpecificationResult,
    SubmitMessageResult, TurnOutcome,
};
pub use session_locks::{SessionLocks, TurnGuard};
