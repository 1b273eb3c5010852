use quiz_core::model::{Question, QuizReport};
use services::{IntentOutcome, QuestionView, QuizLoopService, QuizPresenter, QuizSession};
use tracing::warn;

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select(usize),
    Confirm,
    Advance,
}

/// What the quiz screen should currently show.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizFrame {
    Question(QuestionView),
    Review(QuizReport),
}

/// Presenter that keeps only the latest frame for the view to read.
#[derive(Clone, Debug, Default)]
pub struct ScreenPresenter {
    frame: Option<QuizFrame>,
}

impl ScreenPresenter {
    #[must_use]
    pub fn frame(&self) -> Option<&QuizFrame> {
        self.frame.as_ref()
    }
}

impl QuizPresenter for ScreenPresenter {
    fn render_question(&mut self, view: &QuestionView) {
        self.frame = Some(QuizFrame::Question(view.clone()));
    }

    fn render_review(&mut self, report: &QuizReport) {
        self.frame = Some(QuizFrame::Review(report.clone()));
    }
}

/// Holds the loaded pool and the running exam for the quiz screen.
#[derive(Debug)]
pub struct QuizVm {
    pool: Vec<Question>,
    session: QuizSession,
    screen: ScreenPresenter,
    image_refs: Vec<String>,
}

impl QuizVm {
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the first frame cannot be rendered.
    pub fn start(quiz_loop: &QuizLoopService, pool: Vec<Question>) -> Result<Self, ViewError> {
        let session = quiz_loop.start_exam(&pool);
        let mut vm = Self {
            pool,
            session,
            screen: ScreenPresenter::default(),
            image_refs: Vec::new(),
        };
        vm.present(quiz_loop)?;
        Ok(vm)
    }

    #[must_use]
    pub fn frame(&self) -> Option<&QuizFrame> {
        self.screen.frame()
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Images of the drawn questions, for preloading.
    #[must_use]
    pub fn image_refs(&self) -> &[String] {
        &self.image_refs
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the workflow fails to render.
    pub fn dispatch(
        &mut self,
        quiz_loop: &QuizLoopService,
        intent: QuizIntent,
    ) -> Result<IntentOutcome, ViewError> {
        let result = match intent {
            QuizIntent::Select(choice) => {
                quiz_loop.select(&mut self.session, choice, &mut self.screen)
            }
            QuizIntent::Confirm => quiz_loop.confirm(&mut self.session, &mut self.screen),
            QuizIntent::Advance => quiz_loop.advance(&mut self.session, &mut self.screen),
        };
        result.map_err(|err| {
            warn!(error = %err, "quiz intent failed");
            ViewError::Unknown
        })
    }

    /// Draw a fresh exam from the already loaded pool.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unknown` if the first frame cannot be rendered.
    pub fn retry(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        self.session = quiz_loop.start_exam(&self.pool);
        self.present(quiz_loop)
    }

    fn present(&mut self, quiz_loop: &QuizLoopService) -> Result<(), ViewError> {
        self.image_refs = self
            .session
            .image_refs()
            .into_iter()
            .map(str::to_owned)
            .collect();
        quiz_loop
            .present(&self.session, &mut self.screen)
            .map_err(|_| ViewError::Unknown)
    }
}

/// Load the pool and start an exam.
///
/// # Errors
///
/// Returns `ViewError::LoadFailed` when the pool cannot be loaded.
pub async fn load_quiz(quiz_loop: &QuizLoopService) -> Result<QuizVm, ViewError> {
    let pool = quiz_loop
        .load_pool()
        .await
        .map_err(|err| ViewError::LoadFailed(err.to_string()))?;
    QuizVm::start(quiz_loop, pool)
}
