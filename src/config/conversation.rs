//! Conversation tuning

use serde::Deserialize;

use super::error::ValidationError;

/// Limits applied to every elicitation session
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Clarifying turns allowed before a session fails
    #[serde(default = "default_max_clarifying_turns")]
    pub max_clarifying_turns: u32,

    /// Questions surfaced per assistant turn
    #[serde(default = "default_questions_per_turn")]
    pub questions_per_turn: usize,

    /// Sampling temperature for the formatting re-prompt
    #[serde(default = "default_reprompt_temperature")]
    pub reprompt_temperature: f32,
}

impl ConversationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=200).contains(&self.max_clarifying_turns) {
            return Err(ValidationError::InvalidTurnBudget);
        }
        if !(1..=10).contains(&self.questions_per_turn) {
            return Err(ValidationError::InvalidQuestionsPerTurn);
        }
        if !(0.0..=2.0).contains(&self.reprompt_temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_clarifying_turns: default_max_clarifying_turns(),
            questions_per_turn: default_questions_per_turn(),
            reprompt_temperature: default_reprompt_temperature(),
        }
    }
}

fn default_max_clarifying_turns() -> u32 {
    20
}

fn default_questions_per_turn() -> usize {
    3
}

fn default_reprompt_temperature() -> f32 {
    0.1
}
