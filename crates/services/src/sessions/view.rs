use quiz_core::model::QuestionId;

use super::progress::QuizProgress;

/// Reveal state of a choice after the question is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoiceFeedback {
    #[default]
    None,
    Correct,
    Wrong,
}

/// A renderable choice. `index` is the original position in the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub index: usize,
    pub text: String,
    pub selected: bool,
    pub feedback: ChoiceFeedback,
}

/// Presentation-agnostic snapshot of the current question.
///
/// Blank choices are already filtered out. No localization or formatting is
/// applied; the UI decides how to show labels and progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub text: Option<String>,
    pub image: Option<String>,
    pub choices: Vec<ChoiceView>,
    pub locked: bool,
    pub can_confirm: bool,
    pub can_advance: bool,
    pub progress: QuizProgress,
}

impl QuestionView {
    #[must_use]
    pub fn selected_choice(&self) -> Option<usize> {
        self.choices.iter().find(|c| c.selected).map(|c| c.index)
    }
}
