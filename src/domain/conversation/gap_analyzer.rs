//! Turns validator output into follow-up questions.

use std::collections::HashSet;

use crate::domain::specification::{SpecificationDraft, ValidationResult, Violation, ViolationKind};

use super::question::{Question, QuestionSeverity};

/// Default number of questions surfaced in one assistant turn.
pub const DEFAULT_QUESTIONS_PER_TURN: usize = 3;

#[derive(Debug, Clone)]
pub struct GapAnalyzer {
    questions_per_turn: usize,
}

impl Default for GapAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_QUESTIONS_PER_TURN)
    }
}

impl GapAnalyzer {
    pub fn new(questions_per_turn: usize) -> Self {
        Self {
            questions_per_turn: questions_per_turn.max(1),
        }
    }

    pub fn questions_per_turn(&self) -> usize {
        self.questions_per_turn
    }

    /// One question per target field, most severe first.
    ///
    /// Within a severity band the validator's order is kept, which follows
    /// the document order of the specification.
    pub fn analyze(&self, result: &ValidationResult, draft: &SpecificationDraft) -> Vec<Question> {
        let project = draft.title().unwrap_or("your project");
        let mut seen = HashSet::new();
        let mut questions: Vec<Question> = result
            .violations()
            .iter()
            .filter_map(|violation| {
                let field = target_field(violation);
                if !seen.insert((field.clone(), violation.kind)) {
                    return None;
                }
                let severity =
                    QuestionSeverity::for_violation(violation.kind, violation.is_top_level());
                Some(Question::new(
                    field,
                    violation.kind,
                    severity,
                    question_text(violation, project),
                ))
            })
            .collect();

        questions.sort_by_key(|q| q.severity);
        questions
    }
}

/// The path a question is about. Type errors on list elements are asked
/// about the list as a whole.
fn target_field(violation: &Violation) -> String {
    let path = violation.path.as_str();
    if violation.kind == ViolationKind::WrongType && path.ends_with(']') {
        if let Some(open) = path.rfind('[') {
            return path[..open].to_string();
        }
    }
    path.to_string()
}

fn question_text(violation: &Violation, project: &str) -> String {
    let leaf = violation.leaf();
    let item = describe_item(violation);

    match violation.kind {
        ViolationKind::Missing if violation.is_top_level() => match leaf {
            "title" => "What would you like to call this project?".to_string(),
            "description" => format!("What does {project} do?"),
            "features" => format!(
                "What are the main features of {project}, and how important is each one (high, medium or low)?"
            ),
            "technologies" => {
                format!("Which technologies would you like to build {project} with, and what is each one for?")
            }
            "architecture" => format!(
                "How should {project} be structured (monolith, microservices or serverless), and what are its main components?"
            ),
            other => format!("What is the {} of {project}?", humanize(other)),
        },
        ViolationKind::Missing => match leaf {
            "priority" => format!("How important is {}: high, medium or low?", item_or(&item, project)),
            "style" => format!("Should {project} be a monolith, microservices or serverless?"),
            "components" => {
                format!("What are the main components of {project}, and what does each one do?")
            }
            "name" => format!("What should {} be called?", item_or(&item, project)),
            other => format!("What is the {} of {}?", humanize(other), item_or(&item, project)),
        },
        ViolationKind::WrongType => {
            let expected = violation.expected.as_deref().unwrap_or("something else");
            format!(
                "Could you restate the {} of {}? It should be {expected}.",
                humanize(leaf),
                item_or(&item, project)
            )
        }
        ViolationKind::InvalidEnum => {
            let allowed = violation
                .expected
                .as_deref()
                .map(|e| e.trim_start_matches("one of: "))
                .unwrap_or("one of the listed options");
            format!(
                "Which {} fits {} best: {allowed}?",
                humanize(leaf),
                item_or(&item, project)
            )
        }
        ViolationKind::DanglingReference => {
            let who = violation
                .subject
                .clone()
                .or(item)
                .unwrap_or_else(|| "this component".to_string());
            match violation.expected.as_deref() {
                Some(target) => format!(
                    "Which existing component does {who} interact with? There is no component called '{target}'."
                ),
                None => format!("Which existing component does {who} interact with?"),
            }
        }
    }
}

fn item_or(item: &Option<String>, project: &str) -> String {
    item.clone().unwrap_or_else(|| project.to_string())
}

/// "the feature 'Login'" or "feature 2" for a nested violation.
fn describe_item(violation: &Violation) -> Option<String> {
    let parent = &violation.path[..violation.path.rfind('.')?];
    let open = parent.rfind('[')?;
    let index: usize = parent[open + 1..parent.len() - 1].parse().ok()?;
    let container = parent[..open].rsplit('.').next().unwrap_or(&parent[..open]);
    let noun = match container {
        "features" => "feature",
        "technologies" => "technology",
        "components" => "component",
        "dataModels" => "data model",
        "implementationPlan" => "phase",
        "tasks" => "task",
        _ => "item",
    };
    Some(match violation.subject.as_deref() {
        Some(name) => format!("the {noun} '{name}'"),
        None => format!("{noun} {}", index + 1),
    })
}

/// `implementationNotes` → `implementation notes`.
fn humanize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
