//! AccessGuard - the authorization check every workflow entry point runs.
//!
//! Applies the same role and account-status rules as session resolution, so
//! a partner suspended mid-session loses access on their next request rather
//! than their next sign-in.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::domain::account::{AccountStatus, PartnerAccount, ReferralAgent};
use crate::domain::foundation::{AuthenticatedUser, DomainError, OwnedByUser};
use crate::domain::notification::Recipient;
use crate::domain::session::{
    decide_account, AccountLookup, Administrator, DenialReason, Role, SessionDecision,
};
use crate::ports::{AgentRepository, PartnerRepository, RoleReader};

#[derive(Clone)]
pub struct AccessGuard {
    roles: Arc<dyn RoleReader>,
    partners: Arc<dyn PartnerRepository>,
    agents: Arc<dyn AgentRepository>,
}

impl AccessGuard {
    pub fn new(
        roles: Arc<dyn RoleReader>,
        partners: Arc<dyn PartnerRepository>,
        agents: Arc<dyn AgentRepository>,
    ) -> Self {
        Self {
            roles,
            partners,
            agents,
        }
    }

    /// Holding the administrator role is enough; admins carry no status.
    pub async fn require_admin(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Administrator, WorkflowError> {
        self.require_role(user, Role::Administrator).await?;
        Ok(Administrator::new(user.id.clone()))
    }

    pub async fn require_active_partner(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<PartnerAccount, WorkflowError> {
        self.require_role(user, Role::Partner).await?;
        let found = self.partners.find_by_user_id(&user.id).await;
        let partner = Self::gate(user, Role::Partner, found, |p| p.status)?;
        Ok(partner)
    }

    pub async fn require_active_agent(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<ReferralAgent, WorkflowError> {
        self.require_role(user, Role::ReferralAgent).await?;
        let found = self.agents.find_by_user_id(&user.id).await;
        let agent = Self::gate(user, Role::ReferralAgent, found, |a| a.status)?;
        Ok(agent)
    }

    /// The message-box identity of an active partner or agent acting as `role`.
    pub async fn require_recipient(
        &self,
        user: &AuthenticatedUser,
        role: Role,
    ) -> Result<Recipient, WorkflowError> {
        match role {
            Role::Partner => Ok(Recipient::Partner(self.require_active_partner(user).await?.id)),
            Role::ReferralAgent => Ok(Recipient::Agent(self.require_active_agent(user).await?.id)),
            Role::Administrator => Err(WorkflowError::forbidden(
                "Administrators have no notification inbox",
            )),
        }
    }

    async fn require_role(&self, user: &AuthenticatedUser, role: Role) -> Result<(), WorkflowError> {
        let held = self.roles.roles_for(&user.id).await.map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Role lookup failed");
            WorkflowError::AccessDenied(DenialReason::UnableToVerify)
        })?;
        if held.contains(&role) {
            return Ok(());
        }
        tracing::warn!(
            user_id = %user.id,
            required = role.as_str(),
            "Access refused: role not held"
        );
        Err(WorkflowError::forbidden(format!(
            "This action requires the {} role",
            role.as_str()
        )))
    }

    /// Lets the account through only when the shared decision grants it and
    /// the row belongs to the caller.
    fn gate<A: OwnedByUser>(
        user: &AuthenticatedUser,
        role: Role,
        found: Result<Option<A>, DomainError>,
        status_of: impl Fn(&A) -> AccountStatus,
    ) -> Result<A, WorkflowError> {
        let (lookup, account) = match found {
            Ok(Some(account)) => (AccountLookup::Found(status_of(&account)), Some(account)),
            Ok(None) => (AccountLookup::Missing, None),
            Err(e) => {
                tracing::error!(
                    user_id = %user.id,
                    role = role.as_str(),
                    error = %e,
                    "Account lookup failed"
                );
                (AccountLookup::Failed, None)
            }
        };

        match (decide_account(role, lookup), account) {
            (SessionDecision::Granted { .. }, Some(account)) => {
                if let Err(e) = account.check_user_ownership(&user.id) {
                    tracing::error!(
                        user_id = %user.id,
                        error = %e,
                        "Account row owned by another principal"
                    );
                    return Err(WorkflowError::AccessDenied(DenialReason::InvalidCredentials));
                }
                Ok(account)
            }
            (SessionDecision::Denied { reason }, _) => {
                tracing::warn!(user_id = %user.id, reason = ?reason, "Access refused");
                Err(WorkflowError::AccessDenied(reason))
            }
            (SessionDecision::Granted { .. }, None) => {
                Err(WorkflowError::AccessDenied(DenialReason::InvalidCredentials))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::account::{AccountDecision, PartnerProfile};
    use crate::domain::foundation::{Timestamp, UserId};

    fn user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), "x@example.com", None, "token")
    }

    fn guard(store: &Arc<InMemoryStore>) -> AccessGuard {
        AccessGuard::new(store.clone(), store.clone(), store.clone())
    }

    async fn partner(store: &InMemoryStore, id: &str, approve: bool) -> PartnerAccount {
        let uid = UserId::new(id).unwrap();
        store.assign(&uid, Role::Partner).await.unwrap();
        let mut account = PartnerAccount::register(
            uid,
            PartnerProfile {
                business_name: "Biz".to_string(),
                location: "Town".to_string(),
                bio: None,
                show_contact_info: false,
                phone: None,
                whatsapp: None,
            },
            Timestamp::now(),
        )
        .unwrap();
        if approve {
            let admin = Administrator::new(UserId::new("root").unwrap());
            account
                .review(AccountDecision::Approve, &admin, Timestamp::now())
                .unwrap();
        }
        PartnerRepository::save(store, &account).await.unwrap();
        account
    }

    #[tokio::test]
    async fn admin_role_yields_capability() {
        let store = Arc::new(InMemoryStore::new());
        let uid = UserId::new("boss").unwrap();
        store.assign(&uid, Role::Administrator).await.unwrap();
        let admin = guard(&store).require_admin(&user("boss")).await.unwrap();
        assert_eq!(admin.user_id(), &uid);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let store = Arc::new(InMemoryStore::new());
        let err = guard(&store).require_admin(&user("nobody")).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn active_partner_passes() {
        let store = Arc::new(InMemoryStore::new());
        let account = partner(&store, "p1", true).await;
        let found = guard(&store).require_active_partner(&user("p1")).await.unwrap();
        assert_eq!(found.id, account.id);
    }

    #[tokio::test]
    async fn pending_partner_is_denied_with_reason() {
        let store = Arc::new(InMemoryStore::new());
        partner(&store, "p1", false).await;
        let err = guard(&store)
            .require_active_partner(&user("p1"))
            .await
            .unwrap_err();
        assert_eq!(err, WorkflowError::AccessDenied(DenialReason::PendingApproval));
    }

    #[tokio::test]
    async fn agent_role_without_account_is_invalid_credentials() {
        let store = Arc::new(InMemoryStore::new());
        let uid = UserId::new("a1").unwrap();
        store.assign(&uid, Role::ReferralAgent).await.unwrap();
        let err = guard(&store)
            .require_active_agent(&user("a1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::AccessDenied(DenialReason::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn role_store_failure_is_unable_to_verify() {
        let store = Arc::new(InMemoryStore::new());
        partner(&store, "p1", true).await;
        store.fail_on("roles.read");
        let err = guard(&store)
            .require_active_partner(&user("p1"))
            .await
            .unwrap_err();
        assert_eq!(err, WorkflowError::AccessDenied(DenialReason::UnableToVerify));
    }

    #[tokio::test]
    async fn recipient_follows_acting_role() {
        let store = Arc::new(InMemoryStore::new());
        let account = partner(&store, "p1", true).await;
        let guard = guard(&store);
        assert_eq!(
            guard.require_recipient(&user("p1"), Role::Partner).await.unwrap(),
            Recipient::Partner(account.id)
        );
        let err = guard
            .require_recipient(&user("p1"), Role::Administrator)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn partner_role_does_not_open_agent_routes() {
        let store = Arc::new(InMemoryStore::new());
        partner(&store, "p1", true).await;
        let err = guard(&store)
            .require_active_agent(&user("p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
