//! SessionStatus enum for tracking the lifecycle of an elicitation session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of an elicitation session.
///
/// ```text
/// collecting ──► clarifying ──► ready
///      │              │
///      └──► failed ◄──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for a title and description.
    #[default]
    Collecting,
    /// Core identity known; closing the remaining gaps.
    Clarifying,
    /// Specification validated and handed off.
    Ready,
    /// Stopped by a backend failure or an exhausted turn budget.
    Failed,
}

impl SessionStatus {
    /// Returns true if the session still takes user messages.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, SessionStatus::Collecting | SessionStatus::Clarifying)
    }

    /// Returns true if all schema sections are required at this status.
    pub fn requires_full_specification(&self) -> bool {
        matches!(self, SessionStatus::Clarifying | SessionStatus::Ready)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Collecting, Clarifying)
                | (Collecting, Failed)
                | (Clarifying, Ready)
                | (Clarifying, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Collecting => vec![Clarifying, Failed],
            Clarifying => vec![Ready, Failed],
            Ready | Failed => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Collecting => "collecting",
            SessionStatus::Clarifying => "clarifying",
            SessionStatus::Ready => "ready",
            SessionStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
