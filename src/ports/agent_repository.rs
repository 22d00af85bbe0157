//! Referral agent repository port.

use async_trait::async_trait;

use crate::domain::account::{AccountStatus, ReferralAgent, ReferralCode};
use crate::domain::foundation::{AgentId, DomainError, UserId};

/// Persistence for referral agent accounts.
///
/// Implementations must keep `user_id` and `referral_code` unique.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Conflict` if the principal already has an agent account or the
    ///   referral code is taken
    async fn save(&self, agent: &ReferralAgent) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `AccountNotFound` if the account does not exist
    async fn update(&self, agent: &ReferralAgent) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &AgentId) -> Result<Option<ReferralAgent>, DomainError>;

    async fn find_by_user_id(&self, user_id: &UserId)
        -> Result<Option<ReferralAgent>, DomainError>;

    async fn find_by_referral_code(
        &self,
        code: &ReferralCode,
    ) -> Result<Option<ReferralAgent>, DomainError>;

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<ReferralAgent>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AgentRepository) {}
    }
}
