use std::sync::Arc;

use quiz_core::model::{DEFAULT_CONTACT_PHONE, DEFAULT_ORGANISATION_NAME};
use storage::repository::{CONTACT_PHONE_KEY, SettingsRepository};
use tracing::{debug, warn};

use crate::error::ContactError;

/// Contact line shown on the home and results screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDisplay {
    pub organisation: String,
    pub phone: String,
}

impl ContactDisplay {
    #[must_use]
    pub fn new(organisation: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            organisation: organisation.into(),
            phone: phone.into(),
        }
    }

    /// `"<organisation> - <phone>"`.
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} - {}", self.organisation, self.phone)
    }
}

impl Default for ContactDisplay {
    fn default() -> Self {
        Self::new(DEFAULT_ORGANISATION_NAME, DEFAULT_CONTACT_PHONE)
    }
}

#[derive(Clone)]
pub struct ContactService {
    repo: Arc<dyn SettingsRepository>,
    organisation: String,
}

impl ContactService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>, organisation: impl Into<String>) -> Self {
        Self {
            repo,
            organisation: organisation.into(),
        }
    }

    /// Read the stored phone line. A missing or blank value falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns `ContactError` when the settings store cannot be read.
    pub async fn load(&self) -> Result<ContactDisplay, ContactError> {
        let stored = self
            .repo
            .get_setting(CONTACT_PHONE_KEY)
            .await?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let phone = stored.unwrap_or_else(|| {
            debug!(key = CONTACT_PHONE_KEY, "no stored contact phone, using default");
            DEFAULT_CONTACT_PHONE.to_string()
        });
        Ok(ContactDisplay::new(self.organisation.clone(), phone))
    }

    /// Like `load`, but a storage failure is logged and replaced by the default.
    pub async fn load_or_default(&self) -> ContactDisplay {
        match self.load().await {
            Ok(contact) => contact,
            Err(err) => {
                warn!(error = %err, "contact lookup failed, using default");
                ContactDisplay::new(self.organisation.clone(), DEFAULT_CONTACT_PHONE)
            }
        }
    }
}
