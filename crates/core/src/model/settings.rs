use thiserror::Error;

/// Number of questions drawn for one exam.
pub const DEFAULT_TAKE_COUNT: u32 = 30;
/// Minimum score to pass. Not scaled by the take count.
pub const DEFAULT_PASS_THRESHOLD: u32 = 24;
pub const DEFAULT_ADVANCE_DEBOUNCE_MS: u32 = 250;
/// Cache-busting tag appended to the pool request.
pub const DEFAULT_POOL_VERSION: &str = "20251228-1";
pub const DEFAULT_ORGANISATION_NAME: &str = "Hajj Brothers Driving School";
/// Shown when no contact string has been stored.
pub const DEFAULT_CONTACT_PHONE: &str = "03865092 - 70581828";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    take_count: u32,
    pass_threshold: u32,
    advance_debounce_ms: u32,
    pool_version: String,
    organisation_name: String,
}

#[derive(Clone, Debug, Default)]
pub struct QuizSettingsDraft {
    pub take_count: Option<u32>,
    pub pass_threshold: Option<u32>,
    pub advance_debounce_ms: Option<u32>,
    pub pool_version: Option<String>,
    pub organisation_name: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("take count must be greater than zero")]
    InvalidTakeCount,
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft, filling unset values with defaults.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError::InvalidTakeCount` when `take_count` is zero.
    pub fn validate(self) -> Result<QuizSettings, QuizSettingsError> {
        let take_count = self.take_count.unwrap_or(DEFAULT_TAKE_COUNT);
        if take_count == 0 {
            return Err(QuizSettingsError::InvalidTakeCount);
        }

        Ok(QuizSettings {
            take_count,
            pass_threshold: self.pass_threshold.unwrap_or(DEFAULT_PASS_THRESHOLD),
            advance_debounce_ms: self
                .advance_debounce_ms
                .unwrap_or(DEFAULT_ADVANCE_DEBOUNCE_MS),
            pool_version: normalize_optional(self.pool_version)
                .unwrap_or_else(|| DEFAULT_POOL_VERSION.to_string()),
            organisation_name: normalize_optional(self.organisation_name)
                .unwrap_or_else(|| DEFAULT_ORGANISATION_NAME.to_string()),
        })
    }
}

impl QuizSettings {
    #[must_use]
    pub fn take_count(&self) -> u32 {
        self.take_count
    }

    #[must_use]
    pub fn pass_threshold(&self) -> u32 {
        self.pass_threshold
    }

    #[must_use]
    pub fn advance_debounce_ms(&self) -> u32 {
        self.advance_debounce_ms
    }

    #[must_use]
    pub fn advance_debounce(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::from(self.advance_debounce_ms))
    }

    #[must_use]
    pub fn pool_version(&self) -> &str {
        &self.pool_version
    }

    #[must_use]
    pub fn organisation_name(&self) -> &str {
        &self.organisation_name
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            take_count: DEFAULT_TAKE_COUNT,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            advance_debounce_ms: DEFAULT_ADVANCE_DEBOUNCE_MS,
            pool_version: DEFAULT_POOL_VERSION.to_string(),
            organisation_name: DEFAULT_ORGANISATION_NAME.to_string(),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
