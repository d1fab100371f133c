//! FinalizeSpecificationHandler - hands a ready specification downstream.
//!
//! The specification is written to the store under its project id and
//! returned to the caller. Finalizing twice rewrites the same document.

use std::sync::Arc;

use super::errors::ConversationError;
use crate::domain::foundation::{ProjectId, SessionId};
use crate::domain::session::Session;
use crate::domain::specification::Specification;
use crate::ports::SpecificationStore;

#[derive(Debug, Clone)]
pub struct FinalizeSpecificationCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeSpecificationResult {
    pub project_id: ProjectId,
    pub specification: Specification,
}

pub struct FinalizeSpecificationHandler {
    store: Arc<dyn SpecificationStore>,
}

impl FinalizeSpecificationHandler {
    pub fn new(store: Arc<dyn SpecificationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: FinalizeSpecificationCommand,
    ) -> Result<FinalizeSpecificationResult, ConversationError> {
        let session = self.store.load(&cmd.session_id).await?;
        let result = publish(self.store.as_ref(), &session).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            project_id = %result.project_id,
            "specification finalized"
        );
        Ok(result)
    }
}

/// Writes a ready session's specification under its project id.
pub(crate) async fn publish(
    store: &dyn SpecificationStore,
    session: &Session,
) -> Result<FinalizeSpecificationResult, ConversationError> {
    let specification = session.specification()?;
    let project_id = ProjectId::from_title(&specification.title)
        .map_err(|e| ConversationError::Internal(e.to_string()))?;

    store.save_specification(&project_id, &specification).await?;

    Ok(FinalizeSpecificationResult {
        project_id,
        specification,
    })
}
