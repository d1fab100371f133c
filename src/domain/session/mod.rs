//! Session module - one elicitation conversation and its lifecycle.

mod aggregate;
mod errors;
mod turn;

pub use aggregate::Session;
pub use errors::SessionError;
pub use turn::{FailureReason, FailureRecord, Turn, TurnRole};
