//! Session aggregate.
//!
//! A session is one ideation conversation: the turns exchanged so far, the
//! specification draft they produced, and where the conversation stands.
//!
//! # Invariants
//!
//! - `turns` only grows; appended turns are never edited
//! - `status` changes only through `SessionStatus` transitions
//! - a `failed` session always carries a failure record
//! - `version` increases by one on every successful store write

use serde::{Deserialize, Serialize};

use crate::domain::conversation::QuestionQueue;
use crate::domain::foundation::{ProjectId, SessionId, SessionStatus, StateMachine, Timestamp};
use crate::domain::specification::{Specification, SpecificationDraft};

use super::errors::SessionError;
use super::turn::{FailureReason, FailureRecord, Turn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    status: SessionStatus,
    turns: Vec<Turn>,
    draft: SpecificationDraft,
    #[serde(default)]
    questions: QuestionQueue,
    #[serde(default)]
    clarifying_turns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<FailureRecord>,
    #[serde(default)]
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Starts an empty session in `collecting`.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            status: SessionStatus::Collecting,
            turns: Vec::new(),
            draft: SpecificationDraft::new(),
            questions: QuestionQueue::new(),
            clarifying_turns: 0,
            failure: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn draft(&self) -> &SpecificationDraft {
        &self.draft
    }

    pub fn questions(&self) -> &QuestionQueue {
        &self.questions
    }

    /// Clarifying turns consumed so far, counted against the turn budget.
    pub fn clarifying_turns(&self) -> u32 {
        self.clarifying_turns
    }

    pub fn failure(&self) -> Option<&FailureRecord> {
        self.failure.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversation
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends the user's message.
    ///
    /// # Errors
    ///
    /// - `EmptyMessage` for blank content
    /// - `Closed` once the session is ready or failed
    pub fn record_user_turn(&mut self, content: &str) -> Result<(), SessionError> {
        if !self.status.accepts_user_input() {
            return Err(SessionError::Closed {
                status: self.status,
            });
        }
        if content.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.push_turn(Turn::user(content));
        Ok(())
    }

    pub fn record_assistant_turn(&mut self, turn: Turn) {
        self.push_turn(turn);
    }

    pub fn draft_mut(&mut self) -> &mut SpecificationDraft {
        self.updated_at = Timestamp::now();
        &mut self.draft
    }

    pub fn questions_mut(&mut self) -> &mut QuestionQueue {
        &mut self.questions
    }

    pub fn transition_to(&mut self, target: SessionStatus) -> Result<(), SessionError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        if self.status == SessionStatus::Ready {
            self.questions.clear();
        }
        Ok(())
    }

    /// Counts a finished clarifying turn and returns the new total.
    pub fn count_clarifying_turn(&mut self) -> u32 {
        self.clarifying_turns += 1;
        self.clarifying_turns
    }

    /// Moves the session to `failed`, keeping the draft for inspection.
    pub fn fail(&mut self, reason: FailureReason, message: impl Into<String>) -> Result<(), SessionError> {
        self.transition_to(SessionStatus::Failed)?;
        self.failure = Some(FailureRecord::new(reason, message));
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────

    /// The finalized specification. Only available once `ready`.
    pub fn specification(&self) -> Result<Specification, SessionError> {
        if self.status != SessionStatus::Ready {
            return Err(SessionError::NotReady {
                status: self.status,
            });
        }
        Ok(Specification::try_from(&self.draft)?)
    }

    /// Storage key for the finalized specification, once a title exists.
    pub fn project_id(&self) -> Option<ProjectId> {
        self.draft.title().and_then(|t| ProjectId::from_title(t).ok())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Records the version assigned by the store.
    pub fn mark_persisted(&mut self, version: u64) {
        self.version = version;
    }

    fn push_turn(&mut self, turn: Turn) {
        self.updated_at = turn.timestamp;
        self.turns.push(turn);
    }
}
