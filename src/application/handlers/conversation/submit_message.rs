//! SubmitMessageHandler - Command handler for one user message.
//!
//! Claims the session lock, runs the turn on a working copy and writes the
//! copy back with a version check. When the turn reaches `ready` the
//! specification is published straight away.

use std::sync::Arc;

use super::controller::{ConversationController, TurnOutcome};
use super::errors::ConversationError;
use super::finalize_specification::publish;
use crate::application::SessionLocks;
use crate::domain::conversation::Question;
use crate::domain::foundation::{ProjectId, SessionId, SessionStatus};
use crate::domain::specification::SpecificationDraft;
use crate::ports::SpecificationStore;

/// Command to send a user message to a session.
#[derive(Debug, Clone)]
pub struct SubmitMessageCommand {
    pub session_id: SessionId,
    pub content: String,
}

impl SubmitMessageCommand {
    pub fn new(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            content: content.into(),
        }
    }
}

/// Result of a processed message.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitMessageResult {
    pub assistant_text: String,
    pub status: SessionStatus,
    pub draft: SpecificationDraft,
    /// Questions asked in this reply.
    pub questions: Vec<Question>,
    /// Every question still open, in priority order.
    pub pending_questions: Vec<Question>,
    /// Set once the specification has been published.
    pub project_id: Option<ProjectId>,
    pub version: u64,
}

/// Handler for SubmitMessage commands.
pub struct SubmitMessageHandler {
    store: Arc<dyn SpecificationStore>,
    controller: Arc<ConversationController>,
    locks: Arc<SessionLocks>,
}

impl SubmitMessageHandler {
    pub fn new(
        store: Arc<dyn SpecificationStore>,
        controller: Arc<ConversationController>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self {
            store,
            controller,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitMessageCommand,
    ) -> Result<SubmitMessageResult, ConversationError> {
        let _guard = self
            .locks
            .try_acquire(&cmd.session_id)
            .ok_or(ConversationError::SessionBusy(cmd.session_id))?;

        let mut working = self.store.load(&cmd.session_id).await?;
        let turn = self.controller.run_turn(&mut working, &cmd.content).await;

        let outcome: TurnOutcome = match turn {
            Ok(outcome) => outcome,
            Err(err @ ConversationError::Backend(_)) => {
                // The failed session is kept, draft included.
                self.store.update(&working).await?;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let version = self.store.update(&working).await?;
        working.mark_persisted(version);

        let project_id = if outcome.status == SessionStatus::Ready {
            Some(publish(self.store.as_ref(), &working).await?.project_id)
        } else {
            None
        };

        tracing::info!(
            session_id = %cmd.session_id,
            status = %outcome.status,
            questions = outcome.questions.len(),
            version,
            "message processed"
        );

        Ok(SubmitMessageResult {
            assistant_text: outcome.assistant_text,
            status: outcome.status,
            draft: working.draft().clone(),
            questions: outcome.questions,
            pending_questions: working.questions().pending().to_vec(),
            project_id,
            version,
        })
    }
}
