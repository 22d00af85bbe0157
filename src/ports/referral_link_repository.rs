//! Referral link repository port.

use async_trait::async_trait;

use crate::domain::account::ReferralLink;
use crate::domain::foundation::{AgentId, DomainError, PartnerId};

/// Append-only store of referral links.
#[async_trait]
pub trait ReferralLinkRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Conflict` if the partner already has a link
    async fn save(&self, link: &ReferralLink) -> Result<(), DomainError>;

    /// The link that brought `partner_id` in, if any.
    async fn find_by_partner(&self, partner_id: &PartnerId)
        -> Result<Option<ReferralLink>, DomainError>;

    async fn list_by_agent(&self, agent_id: &AgentId) -> Result<Vec<ReferralLink>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_link_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ReferralLinkRepository) {}
    }
}
