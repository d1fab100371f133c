//! System prompts and fixed assistant wording.

use crate::domain::foundation::SessionStatus;
use crate::domain::specification::SpecificationDraft;

use super::question::Question;

/// The JSON shape every reply must carry.
pub const SPECIFICATION_FORMAT: &str = r#"{
  "title": "Project title",
  "description": "Two or three sentences",
  "features": [
    {"name": "Feature", "description": "Short description", "priority": "high|medium|low", "requirements": ["..."]}
  ],
  "technologies": [
    {"name": "Technology", "purpose": "Why it is used", "alternatives": ["..."]}
  ],
  "architecture": {
    "style": "monolith|microservices|serverless",
    "components": [
      {"name": "Component", "purpose": "What it does", "interactions": ["Names of other components"]}
    ]
  },
  "dataModels": [{"name": "Model", "fields": ["..."], "relationships": ["..."]}],
  "implementationNotes": ["..."],
  "implementationPlan": [{"phase": "Phase 1", "duration": "2 weeks", "tasks": [{"name": "Task", "duration": "3 days"}]}]
}"#;

const EXPLORING: &str = "You are a creative collaborator helping someone turn a project idea into a buildable specification.

The idea is still taking shape. In your reply:
- briefly acknowledge the idea
- ask a few short, specific questions grouped by theme (core functionality, users, experience)
- suggest three or four features they might want

Do not write a complete specification yet.";

const REFINING: &str = "You are a collaborative partner refining a project specification.

The core idea is known. In your reply:
- keep it concise and conversational, using bullet points where they help
- fold the user's latest answers into the specification
- when you suggest a technology or structure, say briefly why it fits
- address the open questions listed below";

const OUTPUT_RULES: &str = "After your message, always include the complete, updated specification as a single ```json fenced block using exactly this shape. Include only fields you know; leave out the rest. Every component named in an interactions list must exist in the components list.";

/// Sent once, after a reply that contained no usable JSON.
pub const FORMAT_REMINDER: &str = "Your previous reply did not contain a specification I could read. Reply again with the complete, updated specification as one ```json fenced block containing a single valid JSON object (no comments, no trailing commas). Keep any message outside the block short.";

/// Shown to the user when the reply stayed unreadable after the reminder.
pub const REPHRASE_REQUEST: &str = "Sorry, I couldn't turn that into an update to the specification. Could you rephrase or add a little more detail?";

/// Closing line when the model's reply carried no prose of its own.
pub const SPECIFICATION_READY: &str = "The specification is complete and ready to finalize.";

/// Builds the system prompt for the next model call.
///
/// The draft and the open questions are embedded here rather than in the
/// turn history, so history stays exactly what was said.
pub fn system_prompt(
    status: SessionStatus,
    draft: &SpecificationDraft,
    open_questions: &[Question],
) -> String {
    let mode = match status {
        SessionStatus::Collecting => EXPLORING,
        _ => REFINING,
    };

    let mut prompt = format!("{mode}\n\n{OUTPUT_RULES}\n\n{SPECIFICATION_FORMAT}");

    if !draft.is_empty() {
        let rendered = serde_json::to_string_pretty(draft).unwrap_or_default();
        prompt.push_str("\n\nCurrent specification draft:\n```json\n");
        prompt.push_str(&rendered);
        prompt.push_str("\n```");
    }

    if !open_questions.is_empty() {
        prompt.push_str("\n\nOpen questions still to resolve:");
        for question in open_questions {
            prompt.push_str("\n- ");
            prompt.push_str(&question.text);
        }
    }

    prompt
}

/// Composes what the user sees: model prose followed by numbered questions.
pub fn assistant_message(prose: &str, questions: &[Question]) -> String {
    let mut message = prose.trim().to_string();
    if !questions.is_empty() {
        if !message.is_empty() {
            message.push_str("\n\n");
        }
        let numbered: Vec<String> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q.text))
            .collect();
        message.push_str(&numbered.join("\n"));
    }
    message
}
