//! Errors surfaced by the conversation handlers.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ProjectId, SessionId, SessionStatus};
use crate::domain::session::SessionError;
use crate::ports::{AIError, FailureKind, StoreError};

/// Everything a caller of the elicitation engine can be told.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("message content cannot be empty")]
    EmptyMessage,

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session {0} is already processing a message")]
    SessionBusy(SessionId),

    #[error("session is {status} and accepts no further messages")]
    SessionClosed { status: SessionStatus },

    #[error("session is {status}; only a ready session can be finalized")]
    NotReady { status: SessionStatus },

    #[error("session was modified concurrently: {0}")]
    VersionConflict(String),

    #[error("specification not found: {0}")]
    SpecificationNotFound(ProjectId),

    /// The model backend failed; the session has been marked failed.
    #[error("model backend failed: {0}")]
    Backend(#[from] AIError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ConversationError {
    /// Stable code for API error bodies.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConversationError::EmptyMessage => ErrorCode::EmptyMessage,
            ConversationError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            ConversationError::SessionBusy(_) => ErrorCode::SessionBusy,
            ConversationError::SessionClosed { .. } => ErrorCode::SessionClosed,
            ConversationError::NotReady { .. } => ErrorCode::SpecificationNotReady,
            ConversationError::VersionConflict(_) => ErrorCode::VersionConflict,
            ConversationError::SpecificationNotFound(_) => ErrorCode::SpecificationNotFound,
            ConversationError::Backend(err) if err.kind() == FailureKind::RateLimited => {
                ErrorCode::RateLimited
            }
            ConversationError::Backend(_) => ErrorCode::AIProviderError,
            ConversationError::Storage(_) => ErrorCode::StorageError,
            ConversationError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<StoreError> for ConversationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ConversationError::SessionNotFound(id),
            StoreError::VersionConflict { .. } => ConversationError::VersionConflict(err.to_string()),
            StoreError::SpecificationNotFound(id) => ConversationError::SpecificationNotFound(id),
            other => ConversationError::Storage(other.to_string()),
        }
    }
}

impl From<SessionError> for ConversationError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyMessage => ConversationError::EmptyMessage,
            SessionError::Closed { status } => ConversationError::SessionClosed { status },
            SessionError::NotReady { status } => ConversationError::NotReady { status },
            other => ConversationError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_session_not_found() {
        let id = SessionId::new();
        let err = ConversationError::from(StoreError::NotFound(id));
        assert!(matches!(err, ConversationError::SessionNotFound(found) if found == id));
        assert_eq!(err.code(), ErrorCode::SessionNotFound);
    }

    #[test]
    fn stale_write_becomes_version_conflict() {
        let err = ConversationError::from(StoreError::VersionConflict {
            expected: 1,
            actual: 2,
        });
        assert_eq!(err.code(), ErrorCode::VersionConflict);
    }

    #[test]
    fn rate_limits_keep_their_own_code() {
        let err = ConversationError::Backend(AIError::RetriesExhausted {
            attempts: 3,
            last: Box::new(AIError::rate_limited(None)),
        });
        assert_eq!(err.code(), ErrorCode::RateLimited);
        assert_eq!(
            ConversationError::Backend(AIError::AuthenticationFailed).code(),
            ErrorCode::AIProviderError
        );
    }

    #[test]
    fn session_errors_map_to_caller_errors() {
        assert!(matches!(
            ConversationError::from(SessionError::EmptyMessage),
            ConversationError::EmptyMessage
        ));
        assert!(matches!(
            ConversationError::from(SessionError::Closed {
                status: SessionStatus::Ready
            }),
            ConversationError::SessionClosed {
                status: SessionStatus::Ready
            }
        ));
    }
}
