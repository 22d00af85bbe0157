//! Commission module - referral commissions and revenue reports.

mod policy;
mod record;
mod report;

pub use policy::{CommissionPolicy, RateSource, DEFAULT_PLATFORM_RATE, DEFAULT_REFERRAL_RATE};
pub use record::{CommissionRecord, CommissionStatus};
pub use report::{AgentEarningsReport, PartnerRevenueReport};
