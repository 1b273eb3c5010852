use std::sync::Arc;

use services::{ContactService, QuizLoopService};

pub trait UiApp: Send + Sync {
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn contact(&self) -> Arc<ContactService>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
    contact: Arc<ContactService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_loop: app.quiz_loop(),
            contact: app.contact(),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn contact(&self) -> Arc<ContactService> {
        Arc::clone(&self.contact)
    }

    /// Organisation name shown in headers.
    #[must_use]
    pub fn organisation(&self) -> String {
        self.quiz_loop.settings().organisation_name().to_string()
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
