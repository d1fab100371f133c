//! In-Memory Specification Store Adapter
//!
//! Keeps sessions and finalized specifications in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ProjectId, SessionId};
use crate::domain::session::Session;
use crate::domain::specification::Specification;
use crate::ports::{SpecificationStore, StoreError};

/// In-memory storage for sessions and specifications
#[derive(Debug, Clone, Default)]
pub struct InMemorySpecificationStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    specifications: Arc<RwLock<HashMap<ProjectId, Specification>>>,
}

impl InMemorySpecificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Get the number of finalized specifications
    pub async fn specification_count(&self) -> usize {
        self.specifications.read().await.len()
    }
}

#[async_trait]
impl SpecificationStore for InMemorySpecificationStore {
    async fn create(&self, session: &Session) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.id()) {
            return Err(StoreError::AlreadyExists(*session.id()));
        }

        let mut stored = session.clone();
        stored.mark_persisted(1);
        sessions.insert(*session.id(), stored);
        Ok(1)
    }

    async fn load(&self, id: &SessionId) -> Result<Session, StoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    async fn update(&self, session: &Session) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get(session.id())
            .ok_or(StoreError::NotFound(*session.id()))?;

        if current.version() != session.version() {
            return Err(StoreError::VersionConflict {
                expected: session.version(),
                actual: current.version(),
            });
        }

        let version = session.version() + 1;
        let mut stored = session.clone();
        stored.mark_persisted(version);
        sessions.insert(*session.id(), stored);
        Ok(version)
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, StoreError> {
        Ok(self.sessions.read().await.contains_key(id))
    }

    async fn save_specification(
        &self,
        project_id: &ProjectId,
        specification: &Specification,
    ) -> Result<(), StoreError> {
        self.specifications
            .write()
            .await
            .insert(project_id.clone(), specification.clone());
        Ok(())
    }

    async fn load_specification(
        &self,
        project_id: &ProjectId,
    ) -> Result<Specification, StoreError> {
        self.specifications
            .read()
            .await
            .get(project_id)
            .cloned()
            .ok_or_else(|| StoreError::SpecificationNotFound(project_id.clone()))
    }
}
