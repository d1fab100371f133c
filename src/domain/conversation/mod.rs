//! Conversation module - the pure parts of an elicitation turn.
//!
//! Extraction, question generation and prompt wording live here; the
//! orchestration that calls the model is in the application layer.

mod extractor;
mod gap_analyzer;
mod prompts;
mod question;
mod sanitizer;

pub use extractor::{
    balanced, direct, fenced, Candidate, ExtractionAttempt, ExtractionStrategy, ResponseExtractor,
    StrategyFn,
};
pub use gap_analyzer::{GapAnalyzer, DEFAULT_QUESTIONS_PER_TURN};
pub use prompts::{
    assistant_message, system_prompt, FORMAT_REMINDER, REPHRASE_REQUEST, SPECIFICATION_READY, SPECIFICATION_FORMAT,
};
pub use question::{Question, QuestionQueue, QuestionSeverity};
pub use sanitizer::{ResponseSanitizer, SanitizationError, MAX_RESPONSE_LENGTH};
