//! RegisterAgentHandler - signs a principal up as a referral agent.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::InFlightRegistry;
use crate::domain::account::{ReferralAgent, ReferralCode};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::session::Role;
use crate::ports::{AgentRepository, RoleReader};

/// Fresh codes tried before giving up on a collision streak.
const CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct RegisterAgentCommand {
    pub full_name: String,
    pub payout_details: Option<String>,
}

pub struct RegisterAgentHandler {
    agents: Arc<dyn AgentRepository>,
    roles: Arc<dyn RoleReader>,
    in_flight: InFlightRegistry,
}

impl RegisterAgentHandler {
    pub fn new(
        agents: Arc<dyn AgentRepository>,
        roles: Arc<dyn RoleReader>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            agents,
            roles,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        user: &AuthenticatedUser,
        cmd: RegisterAgentCommand,
    ) -> Result<ReferralAgent, WorkflowError> {
        let _token = self.in_flight.acquire("registration", &user.id)?;

        if self.agents.find_by_user_id(&user.id).await?.is_some() {
            return Err(WorkflowError::conflict("A referral agent account already exists"));
        }

        let mut agent = ReferralAgent::register(
            user.id.clone(),
            &cmd.full_name,
            cmd.payout_details,
            Timestamp::now(),
        )?;
        agent.referral_code = self.unused_code(agent.referral_code).await?;
        self.agents.save(&agent).await?;

        if let Err(e) = self.roles.assign(&user.id, Role::ReferralAgent).await {
            tracing::error!(
                user_id = %user.id,
                agent_id = %agent.id,
                error = %e,
                "Agent saved but role assignment failed"
            );
            return Err(WorkflowError::partial_failure("assign_role", e.to_string(), None));
        }

        tracing::info!(
            user_id = %user.id,
            agent_id = %agent.id,
            referral_code = %agent.referral_code,
            "Referral agent registered"
        );
        Ok(agent)
    }

    async fn unused_code(&self, first: ReferralCode) -> Result<ReferralCode, WorkflowError> {
        let mut candidate = first;
        for _ in 0..CODE_ATTEMPTS {
            if self.agents.find_by_referral_code(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            tracing::debug!(code = %candidate, "Referral code collision");
            candidate = ReferralCode::generate();
        }
        Err(WorkflowError::conflict("Could not allocate a unique referral code"))
    }
}
