//! Turns: the immutable, ordered record of a conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::conversation::{ExtractionAttempt, Question};
use crate::domain::foundation::Timestamp;
use crate::domain::specification::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => f.write_str("user"),
            TurnRole::Assistant => f.write_str("assistant"),
        }
    }
}

/// Why a session stopped.
///
/// The backend variants mirror the model client's failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    RateLimited,
    Timeout,
    AuthError,
    ContentFiltered,
    TransportError,
    InvalidRequest,
    TurnBudgetExceeded,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub reason: FailureReason,
    pub message: String,
    pub at: Timestamp,
}

impl FailureRecord {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            at: Timestamp::now(),
        }
    }
}

/// One message in the conversation.
///
/// `content` is replayed to the model verbatim on every later call. The
/// remaining fields record how an assistant turn was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: Timestamp,
    /// First extraction plus the re-prompt, when one was needed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extractions: Vec<ExtractionAttempt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureRecord>,
}

impl Turn {
    fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Timestamp::now(),
            extractions: Vec::new(),
            violations: Vec::new(),
            questions: Vec::new(),
            failure: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    pub fn with_extractions(mut self, extractions: Vec<ExtractionAttempt>) -> Self {
        self.extractions = extractions;
        self
    }

    pub fn with_violations(mut self, violations: Vec<Violation>) -> Self {
        self.violations = violations;
        self
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_failure(mut self, failure: FailureRecord) -> Self {
        self.failure = Some(failure);
        self
    }

    /// The extraction that decided this turn's outcome.
    pub fn extraction(&self) -> Option<&ExtractionAttempt> {
        self.extractions.last()
    }
}
