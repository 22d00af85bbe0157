//! ResolveSessionHandler - decides where an authenticated principal lands.
//!
//! Runs on every authentication event. Role lookup, then (for partners and
//! agents) the account lookup, then the pure decision. Any denial revokes the
//! live session before the result is returned, so a caller never sees a
//! denied principal who is still signed in.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{AuthenticatedUser, UserId};
use crate::domain::session::{
    decide_account, decide_role, AccountLookup, DenialReason, Role, RoleDecision,
    SessionDecision,
};
use crate::ports::{AgentRepository, PartnerRepository, RoleReader, SessionTerminator};

/// Outcome of session resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionResolution {
    pub decision: SessionDecision,
    /// True when the session was revoked. False for grants, and for denials
    /// whose revocation call failed.
    pub signed_out: bool,
}

pub struct ResolveSessionHandler {
    roles: Arc<dyn RoleReader>,
    partners: Arc<dyn PartnerRepository>,
    agents: Arc<dyn AgentRepository>,
    terminator: Arc<dyn SessionTerminator>,
}

impl ResolveSessionHandler {
    pub fn new(
        roles: Arc<dyn RoleReader>,
        partners: Arc<dyn PartnerRepository>,
        agents: Arc<dyn AgentRepository>,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Self {
        Self {
            roles,
            partners,
            agents,
            terminator,
        }
    }

    /// Never fails: store errors become an `UnableToVerify` denial.
    pub async fn handle(&self, user: &AuthenticatedUser) -> SessionResolution {
        let decision = self.decide(&user.id).await;

        match decision {
            SessionDecision::Granted { role, destination } => {
                tracing::info!(
                    user_id = %user.id,
                    role = role.map(|r| r.as_str()).unwrap_or("visitor"),
                    destination = destination.path(),
                    "Session granted"
                );
                SessionResolution {
                    decision,
                    signed_out: false,
                }
            }
            SessionDecision::Denied { reason } => {
                if reason.is_unexpected() {
                    tracing::error!(user_id = %user.id, reason = ?reason, "Session denied");
                } else {
                    tracing::warn!(user_id = %user.id, reason = ?reason, "Session denied");
                }
                let signed_out = match self.terminator.sign_out(user).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(
                            user_id = %user.id,
                            error = %e,
                            "Failed to revoke denied session"
                        );
                        false
                    }
                };
                SessionResolution {
                    decision,
                    signed_out,
                }
            }
        }
    }

    async fn decide(&self, user_id: &UserId) -> SessionDecision {
        let held = match self.roles.roles_for(user_id).await {
            Ok(held) => held,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Role lookup failed");
                return SessionDecision::denied(DenialReason::UnableToVerify);
            }
        };

        let role = match decide_role(&held) {
            RoleDecision::Settled(decision) => return decision,
            RoleDecision::NeedsAccount(role) => role,
        };

        let lookup = self.lookup(role, user_id).await;
        decide_account(role, lookup)
    }

    async fn lookup(&self, role: Role, user_id: &UserId) -> AccountLookup {
        let status = match role {
            Role::Partner => self
                .partners
                .find_by_user_id(user_id)
                .await
                .map(|found| found.map(|p| p.status)),
            Role::ReferralAgent => self
                .agents
                .find_by_user_id(user_id)
                .await
                .map(|found| found.map(|a| a.status)),
            Role::Administrator => return AccountLookup::Missing,
        };

        match status {
            Ok(Some(status)) => AccountLookup::Found(status),
            Ok(None) => AccountLookup::Missing,
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    role = role.as_str(),
                    error = %e,
                    "Account lookup failed"
                );
                AccountLookup::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionTerminator;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::account::{
        AccountDecision, AccountStatus, PartnerAccount, PartnerProfile, ReferralAgent,
    };
    use crate::domain::foundation::Timestamp;
    use crate::domain::session::{Administrator, Destination};

    // ════════════════════════════════════════════════════════════════════════════
    // Fixtures
    // ════════════════════════════════════════════════════════════════════════════

    struct Fixture {
        store: Arc<InMemoryStore>,
        terminator: Arc<MockSessionTerminator>,
        handler: ResolveSessionHandler,
    }

    fn fixture_with(terminator: MockSessionTerminator) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let terminator = Arc::new(terminator);
        let handler = ResolveSessionHandler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            terminator.clone(),
        );
        Fixture {
            store,
            terminator,
            handler,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockSessionTerminator::new())
    }

    fn user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), "x@example.com", None, "token")
    }

    fn admin() -> Administrator {
        Administrator::new(UserId::new("admin").unwrap())
    }

    async fn partner_with_status(store: &InMemoryStore, user_id: &str, status: AccountStatus) {
        let uid = UserId::new(user_id).unwrap();
        store.assign(&uid, Role::Partner).await.unwrap();
        let mut partner = PartnerAccount::register(
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
        let path: &[AccountDecision] = match status {
            AccountStatus::Pending => &[],
            AccountStatus::Active => &[AccountDecision::Approve],
            AccountStatus::Rejected => &[AccountDecision::Reject],
            AccountStatus::Suspended => &[AccountDecision::Approve, AccountDecision::Suspend],
        };
        for decision in path {
            partner.review(*decision, &admin(), Timestamp::now()).unwrap();
        }
        PartnerRepository::save(store, &partner).await.unwrap();
    }

    async fn agent_with_status(store: &InMemoryStore, user_id: &str, status: AccountStatus) {
        let uid = UserId::new(user_id).unwrap();
        store.assign(&uid, Role::ReferralAgent).await.unwrap();
        let mut agent = ReferralAgent::register(uid, "Agent", None, Timestamp::now()).unwrap();
        let path: &[AccountDecision] = match status {
            AccountStatus::Pending => &[],
            AccountStatus::Active => &[AccountDecision::Approve],
            AccountStatus::Rejected => &[AccountDecision::Reject],
            AccountStatus::Suspended => &[AccountDecision::Approve, AccountDecision::Suspend],
        };
        for decision in path {
            agent.review(*decision, &admin(), Timestamp::now()).unwrap();
        }
        AgentRepository::save(store, &agent).await.unwrap();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Grants
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn visitor_without_roles_goes_home() {
        let f = fixture();
        let result = f.handler.handle(&user("visitor")).await;
        assert_eq!(
            result.decision,
            SessionDecision::Granted {
                role: None,
                destination: Destination::Home
            }
        );
        assert!(!result.signed_out);
        assert_eq!(f.terminator.sign_out_count(), 0);
    }

    #[tokio::test]
    async fn admin_is_always_granted() {
        let f = fixture();
        let uid = UserId::new("boss").unwrap();
        f.store.assign(&uid, Role::Administrator).await.unwrap();
        let result = f.handler.handle(&user("boss")).await;
        assert!(result.decision.is_granted());
        assert_eq!(f.terminator.sign_out_count(), 0);
    }

    #[tokio::test]
    async fn active_partner_reaches_dashboard() {
        let f = fixture();
        partner_with_status(&f.store, "p1", AccountStatus::Active).await;
        let result = f.handler.handle(&user("p1")).await;
        assert_eq!(
            result.decision,
            SessionDecision::Granted {
                role: Some(Role::Partner),
                destination: Destination::PartnerDashboard
            }
        );
    }

    #[tokio::test]
    async fn active_agent_reaches_agent_dashboard() {
        let f = fixture();
        let uid = UserId::new("a1").unwrap();
        f.store.assign(&uid, Role::ReferralAgent).await.unwrap();
        let mut agent =
            ReferralAgent::register(uid, "Agent", None, Timestamp::now()).unwrap();
        agent
            .review(AccountDecision::Approve, &admin(), Timestamp::now())
            .unwrap();
        AgentRepository::save(f.store.as_ref(), &agent).await.unwrap();

        let result = f.handler.handle(&user("a1")).await;
        assert_eq!(
            result.decision,
            SessionDecision::Granted {
                role: Some(Role::ReferralAgent),
                destination: Destination::AgentDashboard
            }
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Denials
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn every_non_active_partner_is_signed_out() {
        for (status, reason) in [
            (AccountStatus::Pending, DenialReason::PendingApproval),
            (AccountStatus::Rejected, DenialReason::Rejected),
            (AccountStatus::Suspended, DenialReason::Suspended),
        ] {
            let f = fixture();
            partner_with_status(&f.store, "p1", status).await;
            let result = f.handler.handle(&user("p1")).await;
            assert_eq!(result.decision, SessionDecision::Denied { reason });
            assert!(result.signed_out);
            assert_eq!(f.terminator.sign_out_count(), 1);
        }
    }

    #[tokio::test]
    async fn every_non_active_agent_is_signed_out() {
        for (status, reason) in [
            (AccountStatus::Pending, DenialReason::PendingApproval),
            (AccountStatus::Rejected, DenialReason::Rejected),
            (AccountStatus::Suspended, DenialReason::Suspended),
        ] {
            let f = fixture();
            agent_with_status(&f.store, "a1", status).await;
            let result = f.handler.handle(&user("a1")).await;
            assert_eq!(result.decision, SessionDecision::Denied { reason });
            assert!(result.signed_out);
            assert_eq!(f.terminator.sign_out_count(), 1);
        }
    }

    #[tokio::test]
    async fn role_without_account_is_invalid_credentials() {
        let f = fixture();
        let uid = UserId::new("ghost").unwrap();
        f.store.assign(&uid, Role::ReferralAgent).await.unwrap();
        let result = f.handler.handle(&user("ghost")).await;
        assert_eq!(
            result.decision,
            SessionDecision::Denied {
                reason: DenialReason::InvalidCredentials
            }
        );
        assert!(result.signed_out);
    }

    #[tokio::test]
    async fn role_lookup_failure_is_unable_to_verify() {
        let f = fixture();
        f.store.fail_on("roles.read");
        let result = f.handler.handle(&user("anyone")).await;
        assert_eq!(
            result.decision,
            SessionDecision::Denied {
                reason: DenialReason::UnableToVerify
            }
        );
        assert!(result.signed_out);
    }

    #[tokio::test]
    async fn account_lookup_failure_is_unable_to_verify() {
        let f = fixture();
        partner_with_status(&f.store, "p1", AccountStatus::Active).await;
        f.store.fail_on("partner.read");
        let result = f.handler.handle(&user("p1")).await;
        assert_eq!(
            result.decision,
            SessionDecision::Denied {
                reason: DenialReason::UnableToVerify
            }
        );
    }

    #[tokio::test]
    async fn failed_revocation_still_denies() {
        let f = fixture_with(MockSessionTerminator::failing());
        partner_with_status(&f.store, "p1", AccountStatus::Suspended).await;
        let result = f.handler.handle(&user("p1")).await;
        assert!(!result.decision.is_granted());
        assert!(!result.signed_out);
        assert_eq!(f.terminator.sign_out_count(), 1);
    }

    #[tokio::test]
    async fn agent_role_takes_priority_over_admin() {
        let f = fixture();
        let uid = UserId::new("dual").unwrap();
        f.store.assign(&uid, Role::Administrator).await.unwrap();
        f.store.assign(&uid, Role::ReferralAgent).await.unwrap();
        let result = f.handler.handle(&user("dual")).await;
        assert_eq!(
            result.decision,
            SessionDecision::Denied {
                reason: DenialReason::InvalidCredentials
            }
        );
    }
}
