//! Session and contact settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// How often a pending account's status is re-read while a client waits
    #[serde(default = "default_poll_interval")]
    pub status_poll_interval_secs: u64,

    /// Country calling code for phone numbers written without one
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
}

impl SessionConfig {
    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_secs(self.status_poll_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.status_poll_interval_secs == 0 || self.status_poll_interval_secs > 300 {
            return Err(ValidationError::InvalidPollInterval);
        }
        let code = self.default_country_code.trim_start_matches('+');
        if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidCountryCode);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            status_poll_interval_secs: default_poll_interval(),
            default_country_code: default_country_code(),
        }
    }
}

fn default_poll_interval() -> u64 {
    10
}

fn default_country_code() -> String {
    "91".to_string()
}
