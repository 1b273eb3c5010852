use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::repository::Storage;

use crate::Clock;
use crate::contact_service::ContactService;
use crate::error::AppServicesError;
use crate::pool_loader::{PoolLocation, QuestionSource};
use crate::sessions::QuizLoopService;

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    contact: Arc<ContactService>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        source: Arc<dyn QuestionSource>,
        storage: &Storage,
    ) -> Self {
        let contact = Arc::new(ContactService::new(
            Arc::clone(&storage.settings),
            settings.organisation_name(),
        ));
        let quiz_loop = Arc::new(QuizLoopService::new(clock, settings, source));
        Self { quiz_loop, contact }
    }

    /// Build services backed by `SQLite` storage and the given pool location.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the pool location is invalid or storage
    /// initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        pool_location: &str,
        clock: Clock,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let source = PoolLocation::parse(pool_location)?.into_source(settings.pool_version());
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(clock, settings, source, &storage))
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn contact(&self) -> Arc<ContactService> {
        Arc::clone(&self.contact)
    }
}
