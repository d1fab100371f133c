//! Follow-up questions and the per-session queue that holds them.

use serde::{Deserialize, Serialize};

use crate::domain::specification::ViolationKind;

/// How urgent a question is. Lower variants are asked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSeverity {
    MissingTopLevel,
    MissingNested,
    TypeMismatch,
    DanglingReference,
}

impl QuestionSeverity {
    pub fn for_violation(kind: ViolationKind, top_level: bool) -> Self {
        match kind {
            ViolationKind::Missing if top_level => QuestionSeverity::MissingTopLevel,
            ViolationKind::Missing => QuestionSeverity::MissingNested,
            ViolationKind::WrongType | ViolationKind::InvalidEnum => QuestionSeverity::TypeMismatch,
            ViolationKind::DanglingReference => QuestionSeverity::DanglingReference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Field path the answer fills in.
    pub field: String,
    pub kind: ViolationKind,
    pub severity: QuestionSeverity,
    pub text: String,
    /// How many assistant turns have surfaced this question.
    #[serde(default)]
    pub times_asked: u32,
}

impl Question {
    pub fn new(
        field: impl Into<String>,
        kind: ViolationKind,
        severity: QuestionSeverity,
        text: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            severity,
            text: text.into(),
            times_asked: 0,
        }
    }

    fn same_target(&self, other: &Question) -> bool {
        self.field == other.field && self.kind == other.kind
    }
}

/// Unresolved questions in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionQueue {
    questions: Vec<Question>,
}

impl QuestionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the queue with this turn's questions.
    ///
    /// Questions that were already queued keep their ask count; resolved
    /// ones disappear.
    pub fn refresh(&mut self, fresh: Vec<Question>) {
        let previous = std::mem::take(&mut self.questions);
        self.questions = fresh
            .into_iter()
            .map(|mut question| {
                if let Some(old) = previous.iter().find(|old| old.same_target(&question)) {
                    question.times_asked = old.times_asked;
                }
                question
            })
            .collect();
    }

    /// Takes the next `cap` questions to surface and counts them as asked.
    pub fn next_batch(&mut self, cap: usize) -> Vec<Question> {
        self.questions
            .iter_mut()
            .take(cap)
            .map(|question| {
                question.times_asked += 1;
                question.clone()
            })
            .collect()
    }

    pub fn pending(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn clear(&mut self) {
        self.questions.clear();
    }
}
