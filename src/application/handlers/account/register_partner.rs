//! RegisterPartnerHandler - signs a principal up as a property partner.
//!
//! The account starts Pending. A referral code, when given, must belong to
//! an active agent and produces a `ReferralLink` that later drives commission
//! derivation.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::InFlightRegistry;
use crate::domain::account::{PartnerAccount, PartnerProfile, ReferralAgent, ReferralCode, ReferralLink};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::session::Role;
use crate::ports::{AgentRepository, PartnerRepository, ReferralLinkRepository, RoleReader};

#[derive(Debug, Clone)]
pub struct RegisterPartnerCommand {
    pub profile: PartnerProfile,
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterPartnerResult {
    pub partner: PartnerAccount,
    pub referral_link: Option<ReferralLink>,
}

pub struct RegisterPartnerHandler {
    partners: Arc<dyn PartnerRepository>,
    agents: Arc<dyn AgentRepository>,
    links: Arc<dyn ReferralLinkRepository>,
    roles: Arc<dyn RoleReader>,
    in_flight: InFlightRegistry,
}

impl RegisterPartnerHandler {
    pub fn new(
        partners: Arc<dyn PartnerRepository>,
        agents: Arc<dyn AgentRepository>,
        links: Arc<dyn ReferralLinkRepository>,
        roles: Arc<dyn RoleReader>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            partners,
            agents,
            links,
            roles,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        user: &AuthenticatedUser,
        cmd: RegisterPartnerCommand,
    ) -> Result<RegisterPartnerResult, WorkflowError> {
        let _token = self.in_flight.acquire("registration", &user.id)?;

        // 1. One partner account per principal
        if self.partners.find_by_user_id(&user.id).await?.is_some() {
            return Err(WorkflowError::conflict("A partner account already exists"));
        }

        // 2. Resolve the referring agent before anything is written
        let referrer = match cmd.referral_code.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(self.referring_agent(raw).await?),
            _ => None,
        };

        // 3. Create and persist the pending account
        let now = Timestamp::now();
        let partner = PartnerAccount::register(user.id.clone(), cmd.profile, now)?;
        self.partners.save(&partner).await?;

        // 4. Grant the role so the next sign-in reaches the pending gate
        if let Err(e) = self.roles.assign(&user.id, Role::Partner).await {
            tracing::error!(
                user_id = %user.id,
                partner_id = %partner.id,
                error = %e,
                "Partner saved but role assignment failed"
            );
            return Err(WorkflowError::partial_failure("assign_role", e.to_string(), None));
        }

        // 5. Record the referral
        let referral_link = match referrer {
            Some(agent) => {
                let link = ReferralLink::new(partner.id, agent.id, agent.referral_code.clone(), now);
                if let Err(e) = self.links.save(&link).await {
                    tracing::error!(
                        partner_id = %partner.id,
                        agent_id = %agent.id,
                        error = %e,
                        "Partner saved but referral link was not"
                    );
                    return Err(WorkflowError::partial_failure(
                        "save_referral_link",
                        e.to_string(),
                        None,
                    ));
                }
                Some(link)
            }
            None => None,
        };

        tracing::info!(
            user_id = %user.id,
            partner_id = %partner.id,
            referred = referral_link.is_some(),
            "Partner registered"
        );

        Ok(RegisterPartnerResult {
            partner,
            referral_link,
        })
    }

    async fn referring_agent(&self, raw: &str) -> Result<ReferralAgent, WorkflowError> {
        let code = ReferralCode::parse(raw)?;
        match self.agents.find_by_referral_code(&code).await? {
            Some(agent) if agent.is_active() => Ok(agent),
            Some(_) => Err(WorkflowError::validation(
                "referral_code",
                "referral code is not active",
            )),
            None => Err(WorkflowError::validation(
                "referral_code",
                "unknown referral code",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{profile, user, Harness};
    use crate::domain::account::AccountStatus;

    fn handler(h: &Harness) -> RegisterPartnerHandler {
        RegisterPartnerHandler::new(
            h.store.clone(),
            h.store.clone(),
            h.store.clone(),
            h.store.clone(),
            h.in_flight.clone(),
        )
    }

    fn cmd(code: Option<&str>) -> RegisterPartnerCommand {
        RegisterPartnerCommand {
            profile: profile(),
            referral_code: code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn registers_pending_partner_with_role() {
        let h = Harness::new();
        let u = user("p1");
        let result = handler(&h).handle(&u, cmd(None)).await.unwrap();

        assert_eq!(result.partner.status, AccountStatus::Pending);
        assert!(result.referral_link.is_none());
        assert_eq!(h.store.roles_for(&u.id).await.unwrap(), vec![Role::Partner]);
    }

    #[tokio::test]
    async fn second_registration_conflicts() {
        let h = Harness::new();
        let u = user("p1");
        handler(&h).handle(&u, cmd(None)).await.unwrap();
        let err = handler(&h).handle(&u, cmd(None)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Conflict(_)));
    }

    #[tokio::test]
    async fn referral_code_links_to_agent() {
        let h = Harness::new();
        let (_, agent) = h.agent("a1", AccountStatus::Active).await;
        let code = agent.referral_code.as_str().to_lowercase();

        let result = handler(&h).handle(&user("p1"), cmd(Some(&code))).await.unwrap();

        let link = result.referral_link.unwrap();
        assert_eq!(link.agent_id, agent.id);
        assert_eq!(link.partner_id, result.partner.id);
        let stored = h.store.find_by_partner(&result.partner.id).await.unwrap();
        assert_eq!(stored, Some(link));
    }

    #[tokio::test]
    async fn unknown_referral_code_writes_nothing() {
        let h = Harness::new();
        let u = user("p1");
        let err = handler(&h)
            .handle(&u, cmd(Some("REF-ZZZZ9999")))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "referral_code"));
        assert!(PartnerRepository::find_by_user_id(h.store.as_ref(), &u.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn inactive_agent_code_is_rejected() {
        let h = Harness::new();
        let (_, agent) = h.agent("a1", AccountStatus::Suspended).await;
        let err = handler(&h)
            .handle(&user("p1"), cmd(Some(agent.referral_code.as_str())))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { .. }));
    }

    #[tokio::test]
    async fn blank_referral_code_is_ignored() {
        let h = Harness::new();
        let result = handler(&h).handle(&user("p1"), cmd(Some("  "))).await.unwrap();
        assert!(result.referral_link.is_none());
    }

    #[tokio::test]
    async fn role_failure_is_partial() {
        let h = Harness::new();
        h.store.fail_on("roles.assign");
        let err = handler(&h).handle(&user("p1"), cmd(None)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::PartialFailure { step: "assign_role", .. }));
    }
}
