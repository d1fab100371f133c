//! Violations produced by the schema validator.
//!
//! A `ValidationResult` is recomputed on every turn against the working
//! draft; it is stored only inside the turn that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What is wrong at a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType,
    InvalidEnum,
    DanglingReference,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationKind::Missing => "missing",
            ViolationKind::WrongType => "wrong_type",
            ViolationKind::InvalidEnum => "invalid_enum",
            ViolationKind::DanglingReference => "dangling_reference",
        };
        f.write_str(s)
    }
}

/// A single schema or consistency defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path with list indices, e.g. `features[1].priority`.
    pub path: String,
    pub kind: ViolationKind,
    pub message: String,
    /// Name of the feature/component/etc. the path points into, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// What the field should have held (type name or allowed values).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
            subject: None,
            expected: None,
        }
    }

    pub fn with_subject(mut self, subject: Option<&str>) -> Self {
        self.subject = subject.map(str::to_string);
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// The top-level specification key this violation lives under.
    pub fn top_level_key(&self) -> &str {
        let end = self
            .path
            .find(|c| c == '.' || c == '[')
            .unwrap_or(self.path.len());
        &self.path[..end]
    }

    /// True when the path names a top-level key itself.
    pub fn is_top_level(&self) -> bool {
        self.top_level_key().len() == self.path.len()
    }

    /// The last named segment of the path (`priority` for `features[0].priority`).
    pub fn leaf(&self) -> &str {
        let trimmed = self.path.trim_end_matches(|c: char| c == ']' || c.is_ascii_digit());
        let trimmed = trimmed.strip_suffix('[').unwrap_or(trimmed);
        trimmed.rsplit('.').next().unwrap_or(trimmed)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.message)
    }
}

/// All violations found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult {
    violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// True if any violation other than a dangling reference sits under `key`.
    ///
    /// Such a key must not be merged into the draft.
    pub fn blocks_key(&self, key: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.kind != ViolationKind::DanglingReference && v.top_level_key() == key)
    }
}

impl IntoIterator for ValidationResult {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl FromIterator<Violation> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}
