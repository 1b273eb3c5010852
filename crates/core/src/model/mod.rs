mod answer;
mod ids;
mod question;
mod settings;
pub mod summary;

pub use answer::AnswerRecord;
pub use ids::QuestionId;
pub use question::{Question, VisibleChoice};
pub use settings::{
    DEFAULT_ADVANCE_DEBOUNCE_MS, DEFAULT_CONTACT_PHONE, DEFAULT_ORGANISATION_NAME,
    DEFAULT_PASS_THRESHOLD, DEFAULT_POOL_VERSION, DEFAULT_TAKE_COUNT, QuizSettings,
    QuizSettingsDraft, QuizSettingsError,
};
pub use summary::{
    NO_ANSWER_PLACEHOLDER, QuizReport, ReviewEntry, SummaryError, UNAVAILABLE_PLACEHOLDER,
};
