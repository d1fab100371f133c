//! StartSessionHandler - Command handler for opening a new elicitation session.

use std::sync::Arc;

use super::errors::ConversationError;
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::SpecificationStore;

/// Command to start a new session.
#[derive(Debug, Clone, Default)]
pub struct StartSessionCommand;

#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub session: Session,
}

/// Handler for starting sessions.
pub struct StartSessionHandler {
    store: Arc<dyn SpecificationStore>,
}

impl StartSessionHandler {
    pub fn new(store: Arc<dyn SpecificationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        _cmd: StartSessionCommand,
    ) -> Result<StartSessionResult, ConversationError> {
        let mut session = Session::new(SessionId::new());
        let version = self.store.create(&session).await?;
        session.mark_persisted(version);

        tracing::info!(session_id = %session.id(), "session started");
        Ok(StartSessionResult { session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySpecificationStore;
    use crate::domain::foundation::SessionStatus;

    #[tokio::test]
    async fn new_session_is_collecting_and_stored() {
        let store = Arc::new(InMemorySpecificationStore::new());
        let handler = StartSessionHandler::new(store.clone());

        let result = handler.handle(StartSessionCommand).await.unwrap();

        assert_eq!(result.session.status(), SessionStatus::Collecting);
        assert_eq!(result.session.version(), 1);
        assert!(store.exists(result.session.id()).await.unwrap());
    }

    #[tokio::test]
    async fn every_start_gets_a_fresh_id() {
        let store = Arc::new(InMemorySpecificationStore::new());
        let handler = StartSessionHandler::new(store.clone());

        let first = handler.handle(StartSessionCommand).await.unwrap();
        let second = handler.handle(StartSessionCommand).await.unwrap();

        assert_ne!(first.session.id(), second.session.id());
        assert_eq!(store.session_count().await, 2);
    }
}
