use chrono::{DateTime, Duration, Utc};

/// Time source for services and tests.
///
/// The advance debounce compares timestamps taken from this clock, so tests use
/// `Clock::Fixed` and move it forward explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Move a fixed clock forward. No effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Convenience for `advance` in milliseconds.
    pub fn advance_millis(&mut self, millis: i64) {
        self.advance(Duration::milliseconds(millis));
    }
}

/// Time-window guard that collapses repeated triggers.
///
/// A trigger is accepted when no earlier trigger was accepted, or when at least
/// `window` has elapsed since the last accepted one. Rejected triggers do not
/// move the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceGuard {
    window: Duration,
    last_accepted: Option<DateTime<Utc>>,
}

impl AdvanceGuard {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    #[must_use]
    pub fn last_accepted(&self) -> Option<DateTime<Utc>> {
        self.last_accepted
    }

    /// Whether a trigger at `now` would be accepted, without recording it.
    #[must_use]
    pub fn would_accept(&self, now: DateTime<Utc>) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => now - last >= self.window,
        }
    }

    /// Record a trigger at `now`. Returns false if it falls inside the window.
    pub fn try_accept(&mut self, now: DateTime<Utc>) -> bool {
        if !self.would_accept(now) {
            return false;
        }
        self.last_accepted = Some(now);
        true
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
