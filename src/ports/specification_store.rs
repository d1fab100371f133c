//! Specification store port.
//!
//! Persists elicitation sessions and finalized specifications. Session
//! writes use optimistic concurrency: every write names the version it was
//! based on and fails with `VersionConflict` when somebody else got there
//! first.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{ProjectId, SessionId};
use crate::domain::session::Session;
use crate::domain::specification::Specification;

/// Errors raised by specification stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session not found: {0}")]
    NotFound(SessionId),

    #[error("session already exists: {0}")]
    AlreadyExists(SessionId),

    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("specification not found: {0}")]
    SpecificationNotFound(ProjectId),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence port for sessions and finalized specifications.
///
/// Implementations must:
/// - assign version 1 on `create` and bump the version by one per `update`
/// - reject an `update` whose `session.version()` differs from the stored one
/// - never hand out partially written sessions
#[async_trait]
pub trait SpecificationStore: Send + Sync {
    /// Stores a brand-new session and returns its version.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if a session with the same id is stored
    async fn create(&self, session: &Session) -> Result<u64, StoreError>;

    /// Loads a session by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such session exists
    async fn load(&self, id: &SessionId) -> Result<Session, StoreError>;

    /// Replaces a stored session and returns the new version.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such session exists
    /// - `VersionConflict` if the stored version moved on
    async fn update(&self, session: &Session) -> Result<u64, StoreError>;

    /// Check if a session exists.
    async fn exists(&self, id: &SessionId) -> Result<bool, StoreError>;

    /// Writes a finalized specification, replacing any earlier one for
    /// the same project.
    async fn save_specification(
        &self,
        project_id: &ProjectId,
        specification: &Specification,
    ) -> Result<(), StoreError>;

    /// Loads a finalized specification.
    ///
    /// # Errors
    ///
    /// - `SpecificationNotFound` if nothing was finalized under that id
    async fn load_specification(&self, project_id: &ProjectId)
        -> Result<Specification, StoreError>;
}
