//! Errors raised by the session aggregate.

use thiserror::Error;

use crate::domain::foundation::{SessionStatus, ValidationError};
use crate::domain::specification::IncompleteSpecification;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is {status} and accepts no further messages")]
    Closed { status: SessionStatus },

    #[error("session is {status}; only a ready session can be finalized")]
    NotReady { status: SessionStatus },

    #[error("message content cannot be empty")]
    EmptyMessage,

    #[error(transparent)]
    InvalidTransition(#[from] ValidationError),

    #[error(transparent)]
    Incomplete(#[from] IncompleteSpecification),
}
