//! GetSessionHandler - Query handler returning a session snapshot.

use std::sync::Arc;

use super::errors::ConversationError;
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::SpecificationStore;

#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for reading sessions.
pub struct GetSessionHandler {
    store: Arc<dyn SpecificationStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SpecificationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, ConversationError> {
        Ok(self.store.load(&query.session_id).await?)
    }
}
