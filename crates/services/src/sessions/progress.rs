/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// Zero-based position of the current question; equals `total` once finished.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub is_finished: bool,
}

impl QuizProgress {
    /// Share of questions already passed, in percent. Zero for an empty session.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.position as f64 / self.total as f64 * 100.0
    }

    /// One-based question number for display.
    #[must_use]
    pub fn display_number(&self) -> usize {
        (self.position + 1).min(self.total.max(1))
    }
}
