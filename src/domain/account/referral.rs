//! Referral links between partners and the agents who referred them.

use serde::{Deserialize, Serialize};

use super::ReferralCode;
use crate::domain::foundation::{AgentId, PartnerId, ReferralLinkId, Timestamp};

/// Link status. Links are never soft-deleted, so only `Active` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralLinkStatus {
    Active,
}

impl ReferralLinkStatus {
    pub fn as_str(&self) -> &'static str {
        "active"
    }
}

/// Immutable record that `agent_id` referred `partner_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralLink {
    pub id: ReferralLinkId,
    pub partner_id: PartnerId,
    pub agent_id: AgentId,
    pub referral_code: ReferralCode,
    pub status: ReferralLinkStatus,
    pub created_at: Timestamp,
}

impl ReferralLink {
    pub fn new(
        partner_id: PartnerId,
        agent_id: AgentId,
        referral_code: ReferralCode,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ReferralLinkId::new(),
            partner_id,
            agent_id,
            referral_code,
            status: ReferralLinkStatus::Active,
            created_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ReferralLinkStatus::Active
    }
}
