//! Commission rates and which one wins.

use serde::{Deserialize, Serialize};

use crate::domain::account::ReferralAgent;
use crate::domain::foundation::{Money, Percentage};

/// Platform-wide referral rate.
pub const DEFAULT_REFERRAL_RATE: Percentage = Percentage::clamped(10);

/// Platform cut deducted from partner revenue in reports.
pub const DEFAULT_PLATFORM_RATE: Percentage = Percentage::clamped(15);

/// Where the referral rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The platform constant applies to every agent.
    #[default]
    Platform,
    /// Each agent's own `commission_rate` applies.
    Agent,
}

/// Commission configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionPolicy {
    pub referral_rate: Percentage,
    pub platform_rate: Percentage,
    pub referral_rate_source: RateSource,
}

impl Default for CommissionPolicy {
    fn default() -> Self {
        Self {
            referral_rate: DEFAULT_REFERRAL_RATE,
            platform_rate: DEFAULT_PLATFORM_RATE,
            referral_rate_source: RateSource::Platform,
        }
    }
}

impl CommissionPolicy {
    /// Rate attributable to `agent` under this policy.
    pub fn referral_rate_for(&self, agent: &ReferralAgent) -> Percentage {
        match self.referral_rate_source {
            RateSource::Platform => self.referral_rate,
            RateSource::Agent => agent.commission_rate,
        }
    }

    pub fn platform_commission(&self, gross: Money) -> Money {
        gross.percent_of(self.platform_rate)
    }
}
