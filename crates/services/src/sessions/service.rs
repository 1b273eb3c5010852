use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use quiz_core::AdvanceGuard;
use quiz_core::model::{AnswerRecord, Question, QuizReport, QuizSettings};

use crate::error::{QuizIntentError, SessionError};
use super::plan::SessionPlan;
use super::progress::QuizProgress;
use super::view::{ChoiceFeedback, ChoiceView, QuestionView};

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where the current question stands in the select → confirm → advance gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    AwaitingSelection,
    Selected { choice: usize },
    Locked { choice: usize },
    Finished,
}

/// Result of a successful advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { position: usize },
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One randomized exam run.
///
/// Owns the drawn questions, the current position, the per-question phase, the
/// running score and the answer log. All mutation goes through `select`,
/// `confirm` and `advance`; a refused intent returns `QuizIntentError` and
/// leaves the session untouched.
#[derive(Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    phase: QuestionPhase,
    score: u32,
    answers: Vec<Option<AnswerRecord>>,
    advance_guard: AdvanceGuard,
    pass_threshold: u32,
}

impl QuizSession {
    /// Create a session over `questions`. An empty list starts finished.
    #[must_use]
    pub fn new(questions: Vec<Question>, pass_threshold: u32, advance_debounce: Duration) -> Self {
        let phase = if questions.is_empty() {
            QuestionPhase::Finished
        } else {
            QuestionPhase::AwaitingSelection
        };
        let answers = vec![None; questions.len()];

        Self {
            questions,
            current: 0,
            phase,
            score: 0,
            answers,
            advance_guard: AdvanceGuard::new(advance_debounce),
            pass_threshold,
        }
    }

    /// Create a session from a sampled plan using configured threshold and debounce.
    #[must_use]
    pub fn from_plan(plan: SessionPlan, settings: &QuizSettings) -> Self {
        Self::new(
            plan.questions,
            settings.pass_threshold(),
            settings.advance_debounce(),
        )
    }

    #[must_use]
    pub fn phase(&self) -> QuestionPhase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn selected_choice(&self) -> Option<usize> {
        match self.phase {
            QuestionPhase::Selected { choice } | QuestionPhase::Locked { choice } => Some(choice),
            QuestionPhase::AwaitingSelection | QuestionPhase::Finished => None,
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self.phase, QuestionPhase::Locked { .. })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuestionPhase::Finished
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn pass_threshold(&self) -> u32 {
        self.pass_threshold
    }

    /// Answer log indexed by session position. `None` means not confirmed.
    #[must_use]
    pub fn answers(&self) -> &[Option<AnswerRecord>] {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            position: if self.is_finished() {
                self.total()
            } else {
                self.current
            },
            total: self.total(),
            answered: self.answered_count(),
            is_finished: self.is_finished(),
        }
    }

    /// Distinct non-blank image references, in session order.
    #[must_use]
    pub fn image_refs(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.questions
            .iter()
            .filter_map(Question::image)
            .filter(|image| seen.insert(*image))
            .collect()
    }

    /// Pick a choice on the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizIntentError::Finished` or `AlreadyLocked` when the question no
    /// longer accepts input, and `InvalidSelection` for an out-of-range or blank choice.
    pub fn select(&mut self, choice: usize) -> Result<(), QuizIntentError> {
        match self.phase {
            QuestionPhase::Finished => return Err(QuizIntentError::Finished),
            QuestionPhase::Locked { .. } => return Err(QuizIntentError::AlreadyLocked),
            QuestionPhase::AwaitingSelection | QuestionPhase::Selected { .. } => {}
        }

        let selectable = self
            .questions
            .get(self.current)
            .is_some_and(|q| q.is_selectable(choice));
        if !selectable {
            return Err(QuizIntentError::InvalidSelection { index: choice });
        }

        self.phase = QuestionPhase::Selected { choice };
        Ok(())
    }

    /// Lock in the current selection and score it.
    ///
    /// # Errors
    ///
    /// Returns `QuizIntentError::NoSelection` without a selection, `AlreadyLocked`
    /// on a repeated confirm, and `Finished` after the last question.
    pub fn confirm(&mut self) -> Result<&AnswerRecord, QuizIntentError> {
        let choice = match self.phase {
            QuestionPhase::Selected { choice } => choice,
            QuestionPhase::AwaitingSelection => return Err(QuizIntentError::NoSelection),
            QuestionPhase::Locked { .. } => return Err(QuizIntentError::AlreadyLocked),
            QuestionPhase::Finished => return Err(QuizIntentError::Finished),
        };
        let position = self.current;
        let Some(question) = self.questions.get(position) else {
            return Err(QuizIntentError::Finished);
        };

        let record = AnswerRecord::new(question, Some(choice));
        if record.is_correct() {
            self.score = self.score.saturating_add(1);
        }

        self.phase = QuestionPhase::Locked { choice };
        let slot = &mut self.answers[position];
        Ok(&*slot.insert(record))
    }

    /// Move past a locked question.
    ///
    /// `now` feeds the debounce window: an advance within the window of the
    /// previous successful one is refused.
    ///
    /// # Errors
    ///
    /// Returns `QuizIntentError::NotConfirmed` before a confirm, `Debounced` inside
    /// the window, and `Finished` once the session is over.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, QuizIntentError> {
        match self.phase {
            QuestionPhase::Locked { .. } => {}
            QuestionPhase::Finished => return Err(QuizIntentError::Finished),
            QuestionPhase::AwaitingSelection | QuestionPhase::Selected { .. } => {
                return Err(QuizIntentError::NotConfirmed);
            }
        }

        if !self.advance_guard.try_accept(now) {
            return Err(QuizIntentError::Debounced);
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.phase = QuestionPhase::AwaitingSelection;
            Ok(Advance::Next {
                position: self.current,
            })
        } else {
            self.phase = QuestionPhase::Finished;
            Ok(Advance::Finished)
        }
    }

    /// Snapshot of the current question for rendering. `None` once finished.
    #[must_use]
    pub fn question_view(&self) -> Option<QuestionView> {
        let question = self.current_question()?;
        let selected = self.selected_choice();
        let locked = self.is_locked();
        let reveal = locked && question.correct_index().is_some();

        let choices = question
            .visible_choices()
            .map(|choice| {
                let is_selected = selected == Some(choice.index);
                let feedback = if !reveal {
                    ChoiceFeedback::None
                } else if question.is_correct_choice(choice.index) {
                    ChoiceFeedback::Correct
                } else if is_selected {
                    ChoiceFeedback::Wrong
                } else {
                    ChoiceFeedback::None
                };
                ChoiceView {
                    index: choice.index,
                    text: choice.text.to_string(),
                    selected: is_selected,
                    feedback,
                }
            })
            .collect();

        Some(QuestionView {
            question_id: question.id().clone(),
            text: question.text().map(str::to_owned),
            image: question.image().map(str::to_owned),
            choices,
            locked,
            can_confirm: matches!(self.phase, QuestionPhase::Selected { .. }),
            can_advance: locked,
            progress: self.progress(),
        })
    }

    /// Build the result report from the answer log.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the report cannot be assembled.
    pub fn report(&self) -> Result<QuizReport, SessionError> {
        Ok(QuizReport::from_answers(
            &self.questions,
            &self.answers,
            self.pass_threshold,
        )?)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("score", &self.score)
            .field("answered", &self.answered_count())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn debounce() -> Duration {
        Duration::milliseconds(250)
    }

    fn question(id: u64, correct: Option<i64>) -> Question {
        let q = Question::new(id, vec!["A".into(), "B".into(), "C".into()]);
        match correct {
            Some(index) => q.with_correct_index(index),
            None => q,
        }
    }

    fn session(questions: Vec<Question>) -> QuizSession {
        QuizSession::new(questions, 24, debounce())
    }

    #[test]
    fn single_question_scenario() {
        let q = Question::new(1_u64, vec!["A".into(), "B".into()]).with_correct_index(1);
        let mut s = session(vec![q]);

        s.select(1).unwrap();
        let record = s.confirm().unwrap().clone();
        assert_eq!(record.chosen_index, Some(1));
        assert_eq!(record.correct_index, Some(1));
        assert_eq!(s.score(), 1);
        assert!(s.is_locked());

        assert_eq!(s.advance(fixed_now()).unwrap(), Advance::Finished);
        assert!(s.is_finished());

        let report = s.report().unwrap();
        assert_eq!(report.score(), 1);
        assert_eq!(report.total(), 1);
        assert!(!report.passed());
    }

    #[test]
    fn confirm_without_select_is_refused() {
        let mut s = session(vec![question(1, Some(0))]);
        assert_eq!(s.confirm().unwrap_err(), QuizIntentError::NoSelection);
        assert!(!s.is_locked());
        assert!(s.answers()[0].is_none());
    }

    #[test]
    fn missing_correct_index_still_locks_and_allows_advance() {
        let mut s = session(vec![question(1, None), question(2, Some(0))]);
        s.select(0).unwrap();
        let record = s.confirm().unwrap().clone();
        assert_eq!(record.correct_index, None);
        assert_eq!(s.score(), 0);

        let view = s.question_view().unwrap();
        assert!(view.can_advance);
        assert!(view.choices.iter().all(|c| c.feedback == ChoiceFeedback::None));

        assert_eq!(
            s.advance(fixed_now()).unwrap(),
            Advance::Next { position: 1 }
        );
    }

    #[test]
    fn empty_session_starts_finished() {
        let mut s = session(Vec::new());
        assert!(s.is_finished());
        assert_eq!(s.score(), 0);
        assert_eq!(s.total(), 0);
        assert!(s.question_view().is_none());
        assert_eq!(s.select(0).unwrap_err(), QuizIntentError::Finished);
        assert_eq!(s.confirm().unwrap_err(), QuizIntentError::Finished);
        assert_eq!(s.advance(fixed_now()).unwrap_err(), QuizIntentError::Finished);

        let report = s.report().unwrap();
        assert_eq!(report.score(), 0);
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn advance_requires_confirm() {
        let mut s = session(vec![question(1, Some(0)), question(2, Some(0))]);
        assert_eq!(s.advance(fixed_now()).unwrap_err(), QuizIntentError::NotConfirmed);
        s.select(1).unwrap();
        assert_eq!(s.advance(fixed_now()).unwrap_err(), QuizIntentError::NotConfirmed);
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn select_is_refused_after_lock_and_confirm_is_not_repeated() {
        let mut s = session(vec![question(1, Some(2))]);
        s.select(2).unwrap();
        s.confirm().unwrap();
        assert_eq!(s.select(0).unwrap_err(), QuizIntentError::AlreadyLocked);
        assert_eq!(s.confirm().unwrap_err(), QuizIntentError::AlreadyLocked);
        assert_eq!(s.score(), 1);
        assert_eq!(s.selected_choice(), Some(2));
    }

    #[test]
    fn reselect_before_confirm_replaces_selection() {
        let mut s = session(vec![question(1, Some(2))]);
        s.select(0).unwrap();
        s.select(2).unwrap();
        assert_eq!(s.selected_choice(), Some(2));
        s.confirm().unwrap();
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn blank_and_out_of_range_choices_are_invalid() {
        let q = Question::new(1_u64, vec!["A".into(), "  ".into(), "C".into()]).with_correct_index(2);
        let mut s = session(vec![q]);
        assert_eq!(
            s.select(1).unwrap_err(),
            QuizIntentError::InvalidSelection { index: 1 }
        );
        assert_eq!(
            s.select(7).unwrap_err(),
            QuizIntentError::InvalidSelection { index: 7 }
        );
        assert_eq!(s.phase(), QuestionPhase::AwaitingSelection);

        let view = s.question_view().unwrap();
        let indices: Vec<_> = view.choices.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2]);

        s.select(2).unwrap();
        s.confirm().unwrap();
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn advances_within_window_collapse() {
        let mut s = session(vec![question(1, Some(0)), question(2, Some(0)), question(3, Some(0))]);
        let t0 = fixed_now();

        s.select(0).unwrap();
        s.confirm().unwrap();
        assert_eq!(s.advance(t0).unwrap(), Advance::Next { position: 1 });

        s.select(0).unwrap();
        s.confirm().unwrap();
        assert_eq!(
            s.advance(t0 + Duration::milliseconds(100)).unwrap_err(),
            QuizIntentError::Debounced
        );
        assert_eq!(s.current_index(), 1);
        assert!(s.is_locked());

        assert_eq!(
            s.advance(t0 + Duration::milliseconds(300)).unwrap(),
            Advance::Next { position: 2 }
        );
    }

    #[test]
    fn double_advance_moves_one_position() {
        let mut s = session(vec![question(1, Some(0)), question(2, Some(0)), question(3, Some(0))]);
        let t0 = fixed_now();
        s.select(0).unwrap();
        s.confirm().unwrap();

        let first = s.advance(t0);
        let second = s.advance(t0 + Duration::milliseconds(10));

        assert_eq!(first.unwrap(), Advance::Next { position: 1 });
        assert!(second.is_err());
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.selected_choice(), None);
        assert!(!s.is_locked());
    }

    #[test]
    fn feedback_marks_correct_and_wrong() {
        let mut s = session(vec![question(1, Some(2))]);
        s.select(0).unwrap();
        let before = s.question_view().unwrap();
        assert!(before.can_confirm);
        assert!(before.choices.iter().all(|c| c.feedback == ChoiceFeedback::None));

        s.confirm().unwrap();
        let view = s.question_view().unwrap();
        assert_eq!(view.choices[0].feedback, ChoiceFeedback::Wrong);
        assert_eq!(view.choices[1].feedback, ChoiceFeedback::None);
        assert_eq!(view.choices[2].feedback, ChoiceFeedback::Correct);
        assert!(!view.can_confirm);
        assert!(view.can_advance);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn score_matches_answer_log() {
        let questions = vec![
            question(1, Some(0)),
            question(2, Some(1)),
            question(3, None),
            question(4, Some(2)),
        ];
        let picks = [0, 0, 1, 2];
        let mut s = session(questions);
        let mut now = fixed_now();
        for pick in picks {
            s.select(pick).unwrap();
            s.confirm().unwrap();
            s.advance(now).unwrap();
            now += Duration::seconds(1);
        }
        assert!(s.is_finished());

        let expected = s
            .answers()
            .iter()
            .flatten()
            .filter(|record| record.is_correct())
            .count();
        assert_eq!(s.score() as usize, expected);
        assert_eq!(s.score(), 2);
        assert_eq!(s.report().unwrap().score(), 2);
    }

    #[test]
    fn fractional_correct_index_marks_choice_wrong() {
        let q: Question =
            serde_json::from_str(r#"{"id": 1, "choices": ["A", "B"], "correctIndex": 0.5}"#)
                .unwrap();
        let mut s = session(vec![q]);
        s.select(1).unwrap();
        s.confirm().unwrap();

        let view = s.question_view().unwrap();
        assert_eq!(view.choices[0].feedback, ChoiceFeedback::None);
        assert_eq!(view.choices[1].feedback, ChoiceFeedback::Wrong);
        assert_eq!(s.score(), 0);

        s.advance(fixed_now()).unwrap();
        let report = s.report().unwrap();
        assert_eq!(report.entries()[0].chosen_label(), "B");
        assert_eq!(report.entries()[0].correct_label(), "Unavailable");
    }

    fn mixed_pool() -> Vec<Question> {
        let with_blank = |id: u64| Question::new(id, vec!["A".into(), " ".into(), "C".into()]);
        vec![
            with_blank(1).with_correct_index(0),
            question(2, Some(1)),
            question(3, None),
            with_blank(4).with_correct_index(2),
            question(5, Some(9)),
            serde_json::from_str(r#"{"id": 6, "choices": ["A", "B"], "correctIndex": 1.5}"#)
                .unwrap(),
        ]
    }

    #[test]
    fn random_intent_sequences_hold_session_rules() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut s = session(mixed_pool());
            let mut now = fixed_now();

            for step in 0..80 {
                let index_before = s.current_index();
                let was_locked = s.is_locked();
                let answers_before = s.answers().to_vec();

                match rng.random_range(0..3) {
                    0 => {
                        let _ = s.select(rng.random_range(0..5));
                    }
                    1 => {
                        let _ = s.confirm();
                    }
                    _ => {
                        now += Duration::milliseconds(rng.random_range(0..600));
                        if s.advance(now).is_ok() {
                            assert!(was_locked, "seed {seed} step {step}: advanced unlocked");
                        }
                    }
                }

                let correct = s
                    .answers()
                    .iter()
                    .flatten()
                    .filter(|record| record.is_correct())
                    .count();
                assert_eq!(s.score() as usize, correct, "seed {seed} step {step}");

                for (before, after) in answers_before.iter().zip(s.answers()) {
                    if before.is_some() {
                        assert_eq!(before, after, "seed {seed} step {step}: record rewritten");
                    }
                }

                if s.current_index() != index_before {
                    assert_eq!(s.selected_choice(), None, "seed {seed} step {step}");
                    assert!(!s.is_locked());
                }
            }
        }
    }

    #[test]
    fn progress_and_image_refs() {
        let questions = vec![
            question(1, Some(0)).with_image("a.png"),
            question(2, Some(0)).with_image(" "),
            question(3, Some(0)).with_image("a.png"),
            question(4, Some(0)).with_image("b.png"),
        ];
        let mut s = session(questions);
        assert_eq!(s.image_refs(), vec!["a.png", "b.png"]);

        s.select(0).unwrap();
        s.confirm().unwrap();
        s.advance(fixed_now()).unwrap();
        let progress = s.progress();
        assert_eq!(progress.position, 1);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.total, 4);
        assert!(!progress.is_finished);
    }
}
