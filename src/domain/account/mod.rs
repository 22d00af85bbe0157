//! Accounts module - partner and referral-agent accounts.
//!
//! Both account kinds share the [`AccountStatus`] lifecycle; only an
//! administrator moves an account between statuses.

mod agent;
mod partner;
mod referral;
mod status;

pub use agent::{ReferralAgent, ReferralCode, DEFAULT_AGENT_RATE};
pub use partner::{PartnerAccount, PartnerProfile};
pub use referral::{ReferralLink, ReferralLinkStatus};
pub use status::{AccountDecision, AccountStatus};
