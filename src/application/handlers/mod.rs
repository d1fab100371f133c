//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversation;

pub use conversation::{
    // Controller
    ConversationController,
    ConversationError,
    ConversationSettings,
    TurnOutcome,
    // Commands and queries
    FinalizeSpecificationCommand,
    FinalizeSpecificationHandler,
    FinalizeSpecificationResult,
    GetSessionHandler,
    GetSessionQuery,
    StartSessionCommand,
    StartSessionHandler,
    StartSessionResult,
    SubmitMessageCommand,
    SubmitMessageHandler,
    SubmitMessageResult,
};
