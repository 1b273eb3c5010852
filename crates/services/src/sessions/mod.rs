mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::{QuizIntentError, SessionError};
pub use plan::{SessionPlan, sample, sample_with_rng};
pub use progress::QuizProgress;
pub use service::{Advance, QuestionPhase, QuizSession};
pub use view::{ChoiceFeedback, ChoiceView, QuestionView};
pub use workflow::{IntentOutcome, QuizLoopService};
