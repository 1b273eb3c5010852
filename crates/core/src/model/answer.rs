use serde::{Deserialize, Serialize};

use super::ids::QuestionId;
use super::question::{Question, matches_index};

/// Immutable record of what was locked in for one session position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub chosen_index: Option<usize>,
    pub correct_index: Option<i64>,
}

impl AnswerRecord {
    /// Captures the chosen index together with the question's correct index.
    #[must_use]
    pub fn new(question: &Question, chosen_index: Option<usize>) -> Self {
        Self {
            question_id: question.id().clone(),
            chosen_index,
            correct_index: question.correct_index(),
        }
    }

    /// True only when the correct index is known and equals the chosen one.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches_index(self.correct_index, self.chosen_index)
    }
}
