//! The elicitation context: everything a request needs, built once by the
//! entry point and shared by reference.

use std::sync::Arc;

use super::handlers::{
    ConversationController, ConversationError, ConversationSettings,
    FinalizeSpecificationCommand, FinalizeSpecificationHandler, FinalizeSpecificationResult,
    GetSessionHandler, GetSessionQuery, StartSessionCommand, StartSessionHandler,
    SubmitMessageCommand, SubmitMessageHandler, SubmitMessageResult,
};
use super::SessionLocks;
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{AIProvider, ProviderInfo, SpecificationStore, SpecificationValidator};

/// Owns the store, model client, validator and settings for one process.
#[derive(Clone)]
pub struct ElicitationContext {
    provider_info: ProviderInfo,
    start_session: Arc<StartSessionHandler>,
    submit_message: Arc<SubmitMessageHandler>,
    get_session: Arc<GetSessionHandler>,
    finalize: Arc<FinalizeSpecificationHandler>,
}

impl ElicitationContext {
    pub fn new(
        store: Arc<dyn SpecificationStore>,
        provider: Arc<dyn AIProvider>,
        validator: Arc<dyn SpecificationValidator>,
        settings: ConversationSettings,
    ) -> Self {
        let provider_info = provider.provider_info();
        let controller = Arc::new(ConversationController::new(provider, validator, settings));
        let locks = Arc::new(SessionLocks::new());

        Self {
            provider_info,
            start_session: Arc::new(StartSessionHandler::new(store.clone())),
            submit_message: Arc::new(SubmitMessageHandler::new(
                store.clone(),
                controller,
                locks,
            )),
            get_session: Arc::new(GetSessionHandler::new(store.clone())),
            finalize: Arc::new(FinalizeSpecificationHandler::new(store)),
        }
    }

    /// Backend provider and model, for health checks and logs.
    pub fn provider_info(&self) -> &ProviderInfo {
        &self.provider_info
    }

    pub async fn start_session(&self) -> Result<SessionId, ConversationError> {
        let result = self.start_session.handle(StartSessionCommand).await?;
        Ok(*result.session.id())
    }

    pub async fn submit_message(
        &self,
        session_id: SessionId,
        content: impl Into<String>,
    ) -> Result<SubmitMessageResult, ConversationError> {
        self.submit_message
            .handle(SubmitMessageCommand::new(session_id, content))
            .await
    }

    pub async fn get_session(&self, session_id: SessionId) -> Result<Session, ConversationError> {
        self.get_session.handle(GetSessionQuery { session_id }).await
    }

    pub async fn finalize(
        &self,
        session_id: SessionId,
    ) -> Result<FinalizeSpecificationResult, ConversationError> {
        self.finalize
            .handle(FinalizeSpecificationCommand { session_id })
            .await
    }
}
