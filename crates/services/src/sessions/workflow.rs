use std::sync::Arc;

use chrono::{DateTime, Utc};
use quiz_core::model::{Question, QuizReport, QuizSettings};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::Clock;
use crate::error::{LoadError, QuizIntentError, SessionError};
use crate::pool_loader::QuestionSource;
use crate::presenter::QuizPresenter;
use super::plan::{sample, sample_with_rng};
use super::service::{Advance, QuizSession};

/// What happened to a user intent routed through `QuizLoopService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The session changed and the current question was re-rendered.
    Applied,
    /// The session refused the intent and nothing changed.
    Ignored(QuizIntentError),
    /// The last question was passed; the review was rendered.
    Finished(QuizReport),
}

impl IntentOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Orchestrates pool loading, exam start and intent handling.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    source: Arc<dyn QuestionSource>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, settings: QuizSettings, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            settings,
            source,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Fetch the full question pool.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the source cannot be read or decoded.
    pub async fn load_pool(&self) -> Result<Vec<Question>, LoadError> {
        let origin = self.source.describe();
        match self.source.load_pool().await {
            Ok(pool) => {
                info!(source = %origin, questions = pool.len(), "question pool loaded");
                Ok(pool)
            }
            Err(err) => {
                warn!(source = %origin, error = %err, "question pool load failed");
                Err(err)
            }
        }
    }

    /// Draw a new exam from an already loaded pool.
    #[must_use]
    pub fn start_exam(&self, pool: &[Question]) -> QuizSession {
        let plan = sample(pool, self.take_count());
        self.log_plan(plan.requested, plan.available, plan.total());
        QuizSession::from_plan(plan, &self.settings)
    }

    /// Same as `start_exam` with a caller-provided random source.
    #[must_use]
    pub fn start_exam_with_rng<R: Rng + ?Sized>(&self, pool: &[Question], rng: &mut R) -> QuizSession {
        let plan = sample_with_rng(pool, self.take_count(), rng);
        self.log_plan(plan.requested, plan.available, plan.total());
        QuizSession::from_plan(plan, &self.settings)
    }

    /// Load the pool and draw an exam from it. Returns the pool for later retries.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the pool cannot be loaded.
    pub async fn load_and_start(&self) -> Result<(Vec<Question>, QuizSession), LoadError> {
        let pool = self.load_pool().await?;
        let session = self.start_exam(&pool);
        Ok((pool, session))
    }

    /// Render the session's current state: the question, or the review once finished.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the review cannot be built.
    pub fn present(
        &self,
        session: &QuizSession,
        presenter: &mut dyn QuizPresenter,
    ) -> Result<(), SessionError> {
        match session.question_view() {
            Some(view) => presenter.render_question(&view),
            None => presenter.render_review(&session.report()?),
        }
        Ok(())
    }

    /// Route a choice pick.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if rendering the review fails.
    pub fn select(
        &self,
        session: &mut QuizSession,
        choice: usize,
        presenter: &mut dyn QuizPresenter,
    ) -> Result<IntentOutcome, SessionError> {
        match session.select(choice) {
            Ok(()) => self.rerender(session, presenter),
            Err(err) => Ok(ignored("select", err)),
        }
    }

    /// Route a confirm.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if rendering the review fails.
    pub fn confirm(
        &self,
        session: &mut QuizSession,
        presenter: &mut dyn QuizPresenter,
    ) -> Result<IntentOutcome, SessionError> {
        match session.confirm() {
            Ok(record) => {
                debug!(
                    question = %record.question_id,
                    correct = record.is_correct(),
                    "answer locked"
                );
                self.rerender(session, presenter)
            }
            Err(err) => Ok(ignored("confirm", err)),
        }
    }

    /// Route an advance using the service clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if rendering the review fails.
    pub fn advance(
        &self,
        session: &mut QuizSession,
        presenter: &mut dyn QuizPresenter,
    ) -> Result<IntentOutcome, SessionError> {
        self.advance_at(session, self.clock.now(), presenter)
    }

    /// Route an advance observed at `now`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if rendering the review fails.
    pub fn advance_at(
        &self,
        session: &mut QuizSession,
        now: DateTime<Utc>,
        presenter: &mut dyn QuizPresenter,
    ) -> Result<IntentOutcome, SessionError> {
        match session.advance(now) {
            Ok(Advance::Next { .. }) => self.rerender(session, presenter),
            Ok(Advance::Finished) => {
                let report = session.report()?;
                info!(
                    score = report.score(),
                    total = report.total(),
                    passed = report.passed(),
                    "exam finished"
                );
                presenter.render_review(&report);
                Ok(IntentOutcome::Finished(report))
            }
            Err(err) => Ok(ignored("advance", err)),
        }
    }

    fn rerender(
        &self,
        session: &QuizSession,
        presenter: &mut dyn QuizPresenter,
    ) -> Result<IntentOutcome, SessionError> {
        self.present(session, presenter)?;
        Ok(IntentOutcome::Applied)
    }

    fn take_count(&self) -> usize {
        usize::try_from(self.settings.take_count()).unwrap_or(usize::MAX)
    }

    fn log_plan(&self, requested: usize, available: usize, drawn: usize) {
        if drawn < requested {
            warn!(requested, available, "question pool smaller than requested exam size");
        }
        debug!(drawn, "exam drawn");
    }
}

fn ignored(intent: &'static str, err: QuizIntentError) -> IntentOutcome {
    let kind = if err.is_out_of_order() {
        "out_of_order"
    } else {
        "invalid_selection"
    };
    debug!(intent, kind, reason = %err, "intent ignored");
    IntentOutcome::Ignored(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool_loader::StaticQuestionSource;
    use crate::presenter::RecordingPresenter;
    use quiz_core::model::QuizSettingsDraft;
    use quiz_core::time::{fixed_clock, fixed_now};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(len: u64) -> Vec<Question> {
        (1..=len)
            .map(|id| Question::new(id, vec!["yes".into(), "no".into()]).with_correct_index(0))
            .collect()
    }

    fn service(take: u32) -> QuizLoopService {
        let settings = QuizSettingsDraft {
            take_count: Some(take),
            pass_threshold: Some(2),
            ..QuizSettingsDraft::default()
        }
        .validate()
        .unwrap();
        QuizLoopService::new(
            fixed_clock(),
            settings,
            Arc::new(StaticQuestionSource::new(pool(5))),
        )
    }

    #[tokio::test]
    async fn load_and_start_draws_take_count() {
        let svc = service(3);
        let (pool, session) = svc.load_and_start().await.unwrap();
        assert_eq!(pool.len(), 5);
        assert_eq!(session.total(), 3);
        assert_eq!(session.pass_threshold(), 2);
    }

    #[test]
    fn small_pool_draws_everything() {
        let svc = service(30);
        let mut rng = StdRng::seed_from_u64(1);
        let session = svc.start_exam_with_rng(&pool(4), &mut rng);
        assert_eq!(session.total(), 4);
    }

    #[test]
    fn full_run_renders_each_step_and_review() {
        let svc = service(2);
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = svc.start_exam_with_rng(&pool(2), &mut rng);
        let mut presenter = RecordingPresenter::new();
        svc.present(&session, &mut presenter).unwrap();

        let mut now = fixed_now();
        for _ in 0..2 {
            assert!(svc.select(&mut session, 0, &mut presenter).unwrap().is_applied());
            assert!(svc.confirm(&mut session, &mut presenter).unwrap().is_applied());
            now += chrono::Duration::seconds(1);
            svc.advance_at(&mut session, now, &mut presenter).unwrap();
        }

        let review = presenter.review.as_ref().unwrap();
        assert_eq!(review.score(), 2);
        assert!(review.passed());
        assert_eq!(presenter.questions.len(), 1 + 2 + 2 + 1);
    }

    #[test]
    fn refused_intent_does_not_render() {
        let svc = service(2);
        let mut session = svc.start_exam(&pool(2));
        let mut presenter = RecordingPresenter::new();

        let outcome = svc.confirm(&mut session, &mut presenter).unwrap();
        assert_eq!(outcome, IntentOutcome::Ignored(QuizIntentError::NoSelection));
        let outcome = svc.advance(&mut session, &mut presenter).unwrap();
        assert_eq!(outcome, IntentOutcome::Ignored(QuizIntentError::NotConfirmed));
        assert!(presenter.questions.is_empty());
    }

    #[test]
    fn refusals_split_bad_choice_from_wrong_order() {
        let svc = service(1);
        let mut session = svc.start_exam(&pool(1));
        let mut presenter = RecordingPresenter::new();

        let IntentOutcome::Ignored(bad_choice) = svc.select(&mut session, 7, &mut presenter).unwrap()
        else {
            panic!("out-of-range select should be ignored");
        };
        assert!(!bad_choice.is_out_of_order());

        let IntentOutcome::Ignored(early) = svc.advance(&mut session, &mut presenter).unwrap() else {
            panic!("advance before confirm should be ignored");
        };
        assert!(early.is_out_of_order());
        assert!(presenter.questions.is_empty());
    }

    #[test]
    fn empty_pool_presents_review_immediately() {
        let svc = service(3);
        let session = svc.start_exam(&[]);
        let mut presenter = RecordingPresenter::new();
        svc.present(&session, &mut presenter).unwrap();
        let review = presenter.review.unwrap();
        assert_eq!(review.total(), 0);
        assert!(presenter.questions.is_empty());
    }
}
