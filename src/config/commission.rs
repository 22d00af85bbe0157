//! Commission rates

use serde::Deserialize;

use crate::domain::commission::{
    CommissionPolicy, RateSource, DEFAULT_PLATFORM_RATE, DEFAULT_REFERRAL_RATE,
};
use crate::domain::foundation::Percentage;

use super::error::ValidationError;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CommissionConfig {
    /// Referral rate in whole percent
    #[serde(default = "default_referral_rate")]
    pub referral_rate: u8,

    /// Platform cut in whole percent
    #[serde(default = "default_platform_rate")]
    pub platform_rate: u8,

    /// `platform` applies `referral_rate` to everyone; `agent` uses each
    /// agent's own rate
    #[serde(default)]
    pub referral_rate_source: RateSource,
}

impl CommissionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        rate("referral_rate", self.referral_rate)?;
        rate("platform_rate", self.platform_rate)?;
        Ok(())
    }

    pub fn policy(&self) -> Result<CommissionPolicy, ValidationError> {
        Ok(CommissionPolicy {
            referral_rate: rate("referral_rate", self.referral_rate)?,
            platform_rate: rate("platform_rate", self.platform_rate)?,
            referral_rate_source: self.referral_rate_source,
        })
    }
}

fn rate(field: &'static str, value: u8) -> Result<Percentage, ValidationError> {
    Percentage::try_new(value).map_err(|_| ValidationError::InvalidRate { field, value })
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            referral_rate: default_referral_rate(),
            platform_rate: default_platform_rate(),
            referral_rate_source: RateSource::default(),
        }
    }
}

fn default_referral_rate() -> u8 {
    DEFAULT_REFERRAL_RATE.value()
}

fn default_platform_rate() -> u8 {
    DEFAULT_PLATFORM_RATE.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_policy() {
        let policy = CommissionConfig::default().policy().unwrap();
        assert_eq!(policy, CommissionPolicy::default());
    }

    #[test]
    fn test_rate_above_hundred_rejected() {
        let config = CommissionConfig {
            platform_rate: 120,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidRate {
                field: "platform_rate",
                value: 120
            })
        );
        assert!(config.policy().is_err());
    }

    #[test]
    fn test_agent_rate_source() {
        let config = CommissionConfig {
            referral_rate: 12,
            referral_rate_source: RateSource::Agent,
            ..Default::default()
        };
        let policy = config.policy().unwrap();
        assert_eq!(policy.referral_rate.value(), 12);
        assert_eq!(policy.referral_rate_source, RateSource::Agent);
    }
}
