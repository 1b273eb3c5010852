mod html;
mod quiz_vm;

pub use html::sanitize_html;
pub use quiz_vm::{QuizFrame, QuizIntent, QuizVm, ScreenPresenter, load_quiz};
