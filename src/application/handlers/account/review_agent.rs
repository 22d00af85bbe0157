//! ReviewAgentHandler - administrator approves, rejects or suspends a referral agent.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::account::{AccountDecision, ReferralAgent};
use crate::domain::foundation::{AgentId, AuthenticatedUser, Timestamp};
use crate::domain::notification::{NotificationKind, Recipient};
use crate::ports::AgentRepository;

use super::review_message;

#[derive(Debug, Clone)]
pub struct ReviewAgentCommand {
    pub agent_id: AgentId,
    pub decision: AccountDecision,
}

#[derive(Debug, Clone)]
pub struct ReviewAgentResult {
    pub agent: ReferralAgent,
    pub notification_error: Option<String>,
}

pub struct ReviewAgentHandler {
    guard: AccessGuard,
    agents: Arc<dyn AgentRepository>,
    notifier: Notifier,
    in_flight: InFlightRegistry,
}

impl ReviewAgentHandler {
    pub fn new(
        guard: AccessGuard,
        agents: Arc<dyn AgentRepository>,
        notifier: Notifier,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            agents,
            notifier,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: ReviewAgentCommand,
    ) -> Result<ReviewAgentResult, WorkflowError> {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("agent", cmd.agent_id)?;

        let mut agent = self
            .agents
            .find_by_id(&cmd.agent_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Agent", cmd.agent_id))?;
        let previous = agent.status;
        let status = agent.review(cmd.decision, &admin, Timestamp::now())?;
        self.agents.update(&agent).await?;

        tracing::info!(
            agent_id = %agent.id,
            admin = %admin.user_id(),
            from = previous.as_str(),
            to = status.as_str(),
            "Referral agent reviewed"
        );

        let (title, message) = review_message(status);
        let notification_error = self
            .notifier
            .notify_best_effort(
                Recipient::Agent(agent.id),
                NotificationKind::AccountReviewed,
                title,
                message,
            )
            .await;

        Ok(ReviewAgentResult {
            agent,
            notification_error,
        })
    }
}
