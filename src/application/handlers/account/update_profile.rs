//! Owner edits of account content fields.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::account::{PartnerAccount, PartnerProfile, ReferralAgent};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::ports::{AgentRepository, PartnerRepository};

pub struct UpdatePartnerProfileHandler {
    guard: AccessGuard,
    partners: Arc<dyn PartnerRepository>,
    in_flight: InFlightRegistry,
}

impl UpdatePartnerProfileHandler {
    pub fn new(
        guard: AccessGuard,
        partners: Arc<dyn PartnerRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            partners,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        profile: PartnerProfile,
    ) -> Result<PartnerAccount, WorkflowError> {
        let mut partner = self.guard.require_active_partner(actor).await?;
        let _token = self.in_flight.acquire("partner", partner.id)?;
        partner.update_profile(profile, Timestamp::now())?;
        self.partners.update(&partner).await?;
        tracing::debug!(partner_id = %partner.id, "Partner profile updated");
        Ok(partner)
    }
}

pub struct UpdatePayoutDetailsHandler {
    guard: AccessGuard,
    agents: Arc<dyn AgentRepository>,
    in_flight: InFlightRegistry,
}

impl UpdatePayoutDetailsHandler {
    pub fn new(
        guard: AccessGuard,
        agents: Arc<dyn AgentRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            agents,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        payout_details: Option<String>,
    ) -> Result<ReferralAgent, WorkflowError> {
        let mut agent = self.guard.require_active_agent(actor).await?;
        let _token = self.in_flight.acquire("agent", agent.id)?;
        agent.update_payout_details(payout_details, Timestamp::now());
        self.agents.update(&agent).await?;
        tracing::debug!(agent_id = %agent.id, "Payout details updated");
        Ok(agent)
    }
}
