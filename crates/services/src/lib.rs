#![forbid(unsafe_code)]

pub mod app_services;
pub mod contact_service;
pub mod error;
pub mod pool_loader;
pub mod presenter;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use contact_service::{ContactDisplay, ContactService};
pub use error::{AppServicesError, ContactError, LoadError, QuizIntentError, SessionError};
pub use pool_loader::{
    FileQuestionSource, HttpQuestionSource, PoolLocation, QuestionSource, StaticQuestionSource,
};
pub use presenter::{QuizPresenter, RecordingPresenter};
pub use sessions::{
    Advance, ChoiceFeedback, ChoiceView, IntentOutcome, QuestionPhase, QuestionView,
    QuizLoopService, QuizProgress, QuizSession, SessionPlan,
};
