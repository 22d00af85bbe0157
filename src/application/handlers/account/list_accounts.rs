//! Administrator listings of partner and agent accounts.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::domain::account::{AccountStatus, PartnerAccount, ReferralAgent};
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::{AgentRepository, PartnerRepository};

/// Optional status filter for account listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListAccountsQuery {
    pub status: Option<AccountStatus>,
}

pub struct ListPartnersHandler {
    guard: AccessGuard,
    partners: Arc<dyn PartnerRepository>,
}

impl ListPartnersHandler {
    pub fn new(guard: AccessGuard, partners: Arc<dyn PartnerRepository>) -> Self {
        Self { guard, partners }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        query: ListAccountsQuery,
    ) -> Result<Vec<PartnerAccount>, WorkflowError> {
        self.guard.require_admin(actor).await?;
        Ok(self.partners.list(query.status).await?)
    }
}

pub struct ListAgentsHandler {
    guard: AccessGuard,
    agents: Arc<dyn AgentRepository>,
}

impl ListAgentsHandler {
    pub fn new(guard: AccessGuard, agents: Arc<dyn AgentRepository>) -> Self {
        Self { guard, agents }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        query: ListAccountsQuery,
    ) -> Result<Vec<ReferralAgent>, WorkflowError> {
        self.guard.require_admin(actor).await?;
        Ok(self.agents.list(query.status).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Harness;

    #[tokio::test]
    async fn admin_filters_partners_by_status() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        h.partner("p1", AccountStatus::Pending).await;
        h.partner("p2", AccountStatus::Active).await;
        h.partner("p3", AccountStatus::Pending).await;

        let handler = ListPartnersHandler::new(h.guard.clone(), h.store.clone());
        let pending = handler
            .handle(
                &admin,
                ListAccountsQuery {
                    status: Some(AccountStatus::Pending),
                },
            )
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
        let all = handler
            .handle(&admin, ListAccountsQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn partners_cannot_list_agents() {
        let h = Harness::new();
        let (partner_user, _) = h.partner("p1", AccountStatus::Active).await;
        let handler = ListAgentsHandler::new(h.guard.clone(), h.store.clone());
        let err = handler
            .handle(&partner_user, ListAccountsQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
