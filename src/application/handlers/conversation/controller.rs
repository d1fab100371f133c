//! Conversation controller - runs one elicitation turn.
//!
//! A turn is: prompt the model with the full history, extract a candidate
//! specification from the reply, validate the draft with the candidate laid
//! over it, merge the keys that came through cleanly, then either finish
//! (`ready`) or ask the next batch of questions.
//!
//! The controller only mutates the `Session` it is handed. Callers give it a
//! working copy and persist that copy once the turn returns, so a dropped
//! turn leaves the stored session untouched.

use serde_json::Value;
use std::sync::Arc;

use super::errors::ConversationError;
use crate::domain::conversation::{
    assistant_message, system_prompt, ExtractionAttempt, GapAnalyzer, Question,
    ResponseExtractor, DEFAULT_QUESTIONS_PER_TURN, FORMAT_REMINDER, REPHRASE_REQUEST,
    SPECIFICATION_READY,
};
use crate::domain::foundation::SessionStatus;
use crate::domain::session::{FailureReason, FailureRecord, Session, Turn, TurnRole};
use crate::domain::specification::{
    MergeReport, Specification, ValidationResult, Violation, ViolationKind,
};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, FailureKind, MessageRole, ModelParameters,
    RequestMetadata, SpecificationValidator,
};

/// Tunables for the elicitation loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSettings {
    pub parameters: ModelParameters,
    /// Clarifying turns allowed before the session fails.
    pub max_clarifying_turns: u32,
    pub questions_per_turn: usize,
    /// Temperature for the formatting re-prompt.
    pub reprompt_temperature: f32,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            parameters: ModelParameters::default(),
            max_clarifying_turns: 20,
            questions_per_turn: DEFAULT_QUESTIONS_PER_TURN,
            reprompt_temperature: 0.1,
        }
    }
}

/// What a finished turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub assistant_text: String,
    pub status: SessionStatus,
    /// Questions surfaced in this turn.
    pub questions: Vec<Question>,
    /// `None` when nothing could be extracted from the reply.
    pub merge: Option<MergeReport>,
}

/// Maps a backend failure kind to the reason recorded on the session.
pub fn failure_reason(kind: FailureKind) -> FailureReason {
    match kind {
        FailureKind::RateLimited => FailureReason::RateLimited,
        FailureKind::Timeout => FailureReason::Timeout,
        FailureKind::AuthError => FailureReason::AuthError,
        FailureKind::ContentFiltered => FailureReason::ContentFiltered,
        FailureKind::TransportError => FailureReason::TransportError,
        FailureKind::InvalidRequest => FailureReason::InvalidRequest,
    }
}

/// Orchestrates model calls, extraction, validation and gap analysis.
pub struct ConversationController {
    provider: Arc<dyn AIProvider>,
    validator: Arc<dyn SpecificationValidator>,
    extractor: ResponseExtractor,
    analyzer: GapAnalyzer,
    settings: ConversationSettings,
}

impl ConversationController {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        validator: Arc<dyn SpecificationValidator>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            provider,
            validator,
            extractor: ResponseExtractor::new(),
            analyzer: GapAnalyzer::new(settings.questions_per_turn),
            settings,
        }
    }

    pub fn settings(&self) -> &ConversationSettings {
        &self.settings
    }

    pub fn provider(&self) -> &Arc<dyn AIProvider> {
        &self.provider
    }

    /// Runs one turn for `user_text` against `session`.
    ///
    /// # Errors
    ///
    /// - `EmptyMessage` / `SessionClosed` before anything is sent
    /// - `Backend` when the model call failed; `session` is then `failed`
    ///   and should still be persisted
    pub async fn run_turn(
        &self,
        session: &mut Session,
        user_text: &str,
    ) -> Result<TurnOutcome, ConversationError> {
        session.record_user_turn(user_text)?;

        let request = self.build_request(session);
        let reply = match self.provider.complete(request.clone()).await {
            Ok(response) => response.content,
            Err(err) => return Err(self.fail_on_backend(session, err, Vec::new())),
        };

        let first = self.extractor.extract(&reply);
        if first.succeeded() {
            return self.apply_extraction(session, first, Vec::new());
        }

        tracing::info!(
            session_id = %session.id(),
            error = first.error.as_deref().unwrap_or("no structured data found"),
            "reply had no readable specification, re-prompting"
        );

        let retry = request
            .with_message(MessageRole::Assistant, reply)
            .with_message(MessageRole::User, FORMAT_REMINDER)
            .with_temperature(self.settings.reprompt_temperature);
        let second_reply = match self.provider.complete(retry).await {
            Ok(response) => response.content,
            Err(err) => return Err(self.fail_on_backend(session, err, vec![first])),
        };

        let second = self.extractor.extract(&second_reply);
        if second.succeeded() {
            return self.apply_extraction(session, second, vec![first]);
        }

        tracing::warn!(session_id = %session.id(), "extraction failed twice, asking user to rephrase");
        session.record_assistant_turn(
            Turn::assistant(REPHRASE_REQUEST).with_extractions(vec![first, second]),
        );
        let outstanding = !session.questions().is_empty()
            || Specification::try_from(session.draft()).is_err();
        self.charge_turn(session, outstanding)?;

        Ok(TurnOutcome {
            assistant_text: REPHRASE_REQUEST.to_string(),
            status: session.status(),
            questions: Vec::new(),
            merge: None,
        })
    }

    fn build_request(&self, session: &Session) -> CompletionRequest {
        let system = system_prompt(
            session.status(),
            session.draft(),
            session.questions().pending(),
        );

        session.turns().iter().fold(
            CompletionRequest::new(RequestMetadata::new(*session.id()))
                .with_system_prompt(system)
                .with_parameters(&self.settings.parameters),
            |request, turn| {
                let role = match turn.role {
                    TurnRole::User => MessageRole::User,
                    TurnRole::Assistant => MessageRole::Assistant,
                };
                request.with_message(role, turn.content.clone())
            },
        )
    }

    fn apply_extraction(
        &self,
        session: &mut Session,
        attempt: ExtractionAttempt,
        earlier: Vec<ExtractionAttempt>,
    ) -> Result<TurnOutcome, ConversationError> {
        let candidate = attempt.candidate_object().cloned().unwrap_or_default();
        let working = session
            .draft()
            .overlay(&candidate)
            .map_err(|e| ConversationError::Internal(e.to_string()))?;

        let level = if session.status() == SessionStatus::Collecting && has_identity(&working) {
            SessionStatus::Clarifying
        } else {
            session.status()
        };

        let mut result = self.validator.validate(&working, level);
        let merge = session.draft_mut().merge_candidate(&candidate, &result);
        result.extend(merge.violations.iter().cloned());

        tracing::debug!(
            session_id = %session.id(),
            strategy = ?attempt.strategy,
            applied = ?merge.applied,
            rejected = ?merge.rejected,
            violations = result.len(),
            "merged extraction"
        );

        if level != session.status() {
            session.transition_to(level)?;
            tracing::info!(session_id = %session.id(), "idea captured, clarifying details");
        }

        let mut extractions = earlier;
        let prose = attempt.prose.clone();
        extractions.push(attempt);

        let complete = match Specification::try_from(session.draft()) {
            Ok(_) => result.is_valid(),
            Err(incomplete) => {
                let unreported = missing_keys(&incomplete.missing, &result);
                result.extend(unreported);
                false
            }
        };

        if complete && level == SessionStatus::Clarifying {
            session.transition_to(SessionStatus::Ready)?;
            let text = match assistant_message(&prose, &[]) {
                text if text.is_empty() => SPECIFICATION_READY.to_string(),
                text => text,
            };
            session.record_assistant_turn(Turn::assistant(&text).with_extractions(extractions));
            tracing::info!(session_id = %session.id(), "specification ready");

            return Ok(TurnOutcome {
                assistant_text: text,
                status: SessionStatus::Ready,
                questions: Vec::new(),
                merge: Some(merge),
            });
        }

        let questions = self.analyzer.analyze(&result, session.draft());
        session.questions_mut().refresh(questions);
        let batch = session
            .questions_mut()
            .next_batch(self.analyzer.questions_per_turn());

        let text = assistant_message(&prose, &batch);
        session.record_assistant_turn(
            Turn::assistant(&text)
                .with_extractions(extractions)
                .with_violations(result.violations().to_vec())
                .with_questions(batch.clone()),
        );
        self.charge_turn(session, !complete)?;

        Ok(TurnOutcome {
            assistant_text: text,
            status: session.status(),
            questions: batch,
            merge: Some(merge),
        })
    }

    /// Counts a clarifying turn and fails the session once the budget is
    /// spent with work outstanding.
    fn charge_turn(&self, session: &mut Session, outstanding: bool) -> Result<(), ConversationError> {
        if session.status() != SessionStatus::Clarifying {
            return Ok(());
        }

        let used = session.count_clarifying_turn();
        if used >= self.settings.max_clarifying_turns && outstanding {
            tracing::warn!(
                session_id = %session.id(),
                turns = used,
                open_questions = session.questions().len(),
                "clarifying turn budget exhausted"
            );
            session.fail(
                FailureReason::TurnBudgetExceeded,
                format!(
                    "still incomplete after {} clarifying turns",
                    self.settings.max_clarifying_turns
                ),
            )?;
        }
        Ok(())
    }

    /// Records a backend failure on the session and hands back the error.
    fn fail_on_backend(
        &self,
        session: &mut Session,
        err: AIError,
        extractions: Vec<ExtractionAttempt>,
    ) -> ConversationError {
        let reason = failure_reason(err.kind());
        tracing::error!(
            session_id = %session.id(),
            reason = %reason,
            error = %err,
            "model backend failed, stopping session"
        );

        let message = err.to_string();
        session.record_assistant_turn(
            Turn::assistant(format!(
                "The model backend failed ({}). Your draft has been kept.",
                reason
            ))
            .with_extractions(extractions)
            .with_failure(FailureRecord::new(reason, &message)),
        );

        match session.fail(reason, message) {
            Ok(()) => ConversationError::Backend(err),
            Err(transition) => transition.into(),
        }
    }
}

/// Missing-key violations for required keys the draft lacks and nothing in
/// `result` already covers.
fn missing_keys(keys: &[&'static str], result: &ValidationResult) -> Vec<Violation> {
    keys.iter()
        .filter(|key| !result.violations().iter().any(|v| v.top_level_key() == **key))
        .map(|key| Violation::new(*key, ViolationKind::Missing, format!("{key} is required")))
        .collect()
}

/// True when the value has a non-blank title and description.
fn has_identity(working: &Value) -> bool {
    let non_blank = |key: &str| {
        working
            .get(key)
            .and_then(Value::as_str)
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    };
    non_blank("title") && non_blank("description")
}
