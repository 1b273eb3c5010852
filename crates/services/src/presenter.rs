//! Rendering seam between the quiz workflow and whatever shows it.

use quiz_core::model::QuizReport;

use crate::sessions::QuestionView;

/// Receives snapshots to display.
///
/// The workflow calls `render_question` after every accepted intent that leaves
/// a question on screen, and `render_review` exactly once when the session ends.
pub trait QuizPresenter {
    fn render_question(&mut self, view: &QuestionView);

    fn render_review(&mut self, report: &QuizReport);
}

/// Presenter that records every rendered frame. Useful for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub questions: Vec<QuestionView>,
    pub review: Option<QuizReport>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuizPresenter for RecordingPresenter {
    fn render_question(&mut self, view: &QuestionView) {
        self.questions.push(view.clone());
    }

    fn render_review(&mut self, report: &QuizReport) {
        self.review = Some(report.clone());
    }
}
