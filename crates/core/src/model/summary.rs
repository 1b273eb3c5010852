use thiserror::Error;

use super::answer::AnswerRecord;
use super::ids::QuestionId;
use super::question::{Question, matches_index};

/// Label used when a position has no usable chosen answer.
pub const NO_ANSWER_PLACEHOLDER: &str = "Not answered";
/// Label used when the correct answer cannot be resolved.
pub const UNAVAILABLE_PLACEHOLDER: &str = "Unavailable";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("answer log has {answers} positions but the session has {questions} questions")]
    AnswerLogMismatch { answers: usize, questions: usize },

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Review line for one session position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub position: usize,
    pub question_id: QuestionId,
    pub text: Option<String>,
    pub image: Option<String>,
    pub chosen_text: Option<String>,
    pub correct_text: Option<String>,
    pub is_correct: bool,
}

impl ReviewEntry {
    #[must_use]
    pub fn chosen_label(&self) -> &str {
        self.chosen_text.as_deref().unwrap_or(NO_ANSWER_PLACEHOLDER)
    }

    #[must_use]
    pub fn correct_label(&self) -> &str {
        self.correct_text.as_deref().unwrap_or(UNAVAILABLE_PLACEHOLDER)
    }
}

/// End-of-session result: score, pass/fail and the per-question review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    score: u32,
    total: u32,
    pass_threshold: u32,
    entries: Vec<ReviewEntry>,
}

impl QuizReport {
    /// Build the report from the session questions and their answer log.
    ///
    /// `answers[i]` belongs to `questions[i]`; a missing or `None` slot means the
    /// position was never confirmed.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::AnswerLogMismatch` if the log is longer than the question list.
    /// Returns `SummaryError::TooManyQuestions` if the question count cannot fit in `u32`.
    pub fn from_answers(
        questions: &[Question],
        answers: &[Option<AnswerRecord>],
        pass_threshold: u32,
    ) -> Result<Self, SummaryError> {
        if answers.len() > questions.len() {
            return Err(SummaryError::AnswerLogMismatch {
                answers: answers.len(),
                questions: questions.len(),
            });
        }
        let total = u32::try_from(questions.len())
            .map_err(|_| SummaryError::TooManyQuestions { len: questions.len() })?;

        let mut score = 0_u32;
        let entries = questions
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let record = answers.get(position).and_then(Option::as_ref);
                let entry = review_entry(position, question, record);
                if entry.is_correct {
                    score = score.saturating_add(1);
                }
                entry
            })
            .collect();

        Ok(Self {
            score,
            total,
            pass_threshold,
            entries,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn pass_threshold(&self) -> u32 {
        self.pass_threshold
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.score >= self.pass_threshold
    }

    #[must_use]
    pub fn entries(&self) -> &[ReviewEntry] {
        &self.entries
    }
}

fn review_entry(position: usize, question: &Question, record: Option<&AnswerRecord>) -> ReviewEntry {
    let chosen_index = record.and_then(|r| r.chosen_index);
    let correct_index = record.map_or(question.correct_index(), |r| r.correct_index);

    let chosen_text = chosen_index
        .and_then(|index| question.choice(index))
        .map(str::to_owned);
    let correct_text = correct_index
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| question.choice(index))
        .map(str::to_owned);

    ReviewEntry {
        position,
        question_id: question.id().clone(),
        text: question.text().map(str::to_owned),
        image: question.image().map(str::to_owned),
        chosen_text,
        correct_text,
        is_correct: matches_index(correct_index, chosen_index),
    }
}
