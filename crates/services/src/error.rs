//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::model::SummaryError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors raised while fetching or decoding the question pool.
///
/// Any of these aborts exam start; the caller surfaces it to the user.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("invalid question pool location: {0}")]
    InvalidLocation(String),
    #[error("question pool request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not read question pool {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question pool is not a valid list of questions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A user intent the quiz session refused.
///
/// The session state is unchanged when one of these is returned. Callers treat
/// them as no-ops.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizIntentError {
    /// Choice index is out of range or names a blank choice.
    #[error("choice {index} cannot be selected")]
    InvalidSelection { index: usize },
    #[error("the current question is already locked")]
    AlreadyLocked,
    #[error("no choice selected")]
    NoSelection,
    #[error("the current question has not been confirmed")]
    NotConfirmed,
    #[error("advance repeated within the debounce window")]
    Debounced,
    #[error("the session is finished")]
    Finished,
}

impl QuizIntentError {
    /// True for intents issued in the wrong order (as opposed to a bad choice index).
    #[must_use]
    pub fn is_out_of_order(&self) -> bool {
        !matches!(self, Self::InvalidSelection { .. })
    }
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Errors emitted by `ContactService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContactError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
