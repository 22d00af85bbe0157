//! Support ticket handlers.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::foundation::{AuthenticatedUser, SupportTicketId, Timestamp};
use crate::domain::session::Role;
use crate::domain::support::{SupportTicket, TicketStatus};
use crate::ports::SupportTicketRepository;

#[derive(Debug, Clone)]
pub struct OpenTicketCommand {
    pub subject: String,
    pub message: String,
}

pub struct OpenTicketHandler {
    guard: AccessGuard,
    tickets: Arc<dyn SupportTicketRepository>,
    in_flight: InFlightRegistry,
}

impl OpenTicketHandler {
    pub fn new(
        guard: AccessGuard,
        tickets: Arc<dyn SupportTicketRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            tickets,
            in_flight,
        }
    }

    /// Opens a ticket for the active partner or agent acting as `role`.
    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        role: Role,
        cmd: OpenTicketCommand,
    ) -> Result<SupportTicket, WorkflowError> {
        let requester = self.guard.require_recipient(actor, role).await?;
        let _token = self.in_flight.acquire("ticket.open", &actor.id)?;
        let ticket = SupportTicket::open(requester, &cmd.subject, &cmd.message, Timestamp::now())?;
        self.tickets.save(&ticket).await?;
        tracing::info!(ticket_id = %ticket.id, requester = ?requester, "Support ticket opened");
        Ok(ticket)
    }
}

#[derive(Debug, Clone)]
pub struct AdvanceTicketCommand {
    pub ticket_id: SupportTicketId,
    pub status: TicketStatus,
    pub response: Option<String>,
}

pub struct AdvanceTicketHandler {
    guard: AccessGuard,
    tickets: Arc<dyn SupportTicketRepository>,
    in_flight: InFlightRegistry,
}

impl AdvanceTicketHandler {
    pub fn new(
        guard: AccessGuard,
        tickets: Arc<dyn SupportTicketRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            tickets,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: AdvanceTicketCommand,
    ) -> Result<SupportTicket, WorkflowError> {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("ticket", cmd.ticket_id)?;

        let mut ticket = self
            .tickets
            .find_by_id(&cmd.ticket_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("SupportTicket", cmd.ticket_id))?;
        ticket.advance(cmd.status, cmd.response, &admin, Timestamp::now())?;
        self.tickets.update(&ticket).await?;

        tracing::info!(
            ticket_id = %ticket.id,
            status = ticket.status.as_str(),
            admin = %admin.user_id(),
            "Support ticket updated"
        );
        Ok(ticket)
    }
}

pub struct ListTicketsHandler {
    guard: AccessGuard,
    tickets: Arc<dyn SupportTicketRepository>,
}

impl ListTicketsHandler {
    pub fn new(guard: AccessGuard, tickets: Arc<dyn SupportTicketRepository>) -> Self {
        Self { guard, tickets }
    }

    pub async fn own(
        &self,
        actor: &AuthenticatedUser,
        role: Role,
    ) -> Result<Vec<SupportTicket>, WorkflowError> {
        let requester = self.guard.require_recipient(actor, role).await?;
        Ok(self.tickets.list_for(&requester).await?)
    }

    pub async fn all(
        &self,
        actor: &AuthenticatedUser,
        status: Option<TicketStatus>,
    ) -> Result<Vec<SupportTicket>, WorkflowError> {
        self.guard.require_admin(actor).await?;
        let tickets = self.tickets.list_all().await?;
        Ok(match status {
            Some(status) => tickets.into_iter().filter(|t| t.status == status).collect(),
            None => tickets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Harness;
    use crate::domain::account::AccountStatus;

    fn cmd() -> OpenTicketCommand {
        OpenTicketCommand {
            subject: "Payout missing".to_string(),
            message: "My March payout never arrived".to_string(),
        }
    }

    #[tokio::test]
    async fn agent_opens_and_admin_resolves() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let (agent_user, _) = h.agent("a1", AccountStatus::Active).await;

        let ticket = OpenTicketHandler::new(h.guard.clone(), h.store.clone(), h.in_flight.clone())
            .handle(&agent_user, Role::ReferralAgent, cmd())
            .await
            .unwrap();
        assert_eq!(ticket.status, TicketStatus::Open);

        let advance = AdvanceTicketHandler::new(h.guard.clone(), h.store.clone(), h.in_flight.clone());
        advance
            .handle(
                &admin,
                AdvanceTicketCommand {
                    ticket_id: ticket.id,
                    status: TicketStatus::InProgress,
                    response: None,
                },
            )
            .await
            .unwrap();
        let resolved = advance
            .handle(
                &admin,
                AdvanceTicketCommand {
                    ticket_id: ticket.id,
                    status: TicketStatus::Resolved,
                    response: Some("Payout re-sent".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(resolved.admin_response.as_deref(), Some("Payout re-sent"));

        let lists = ListTicketsHandler::new(h.guard.clone(), h.store.clone());
        assert_eq!(lists.own(&agent_user, Role::ReferralAgent).await.unwrap().len(), 1);
        assert_eq!(
            lists
                .all(&admin, Some(TicketStatus::Open))
                .await
                .unwrap()
                .len(),
            0
        );
    }

    #[tokio::test]
    async fn open_cannot_jump_to_resolved() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let (u, _) = h.partner("p1", AccountStatus::Active).await;
        let ticket = OpenTicketHandler::new(h.guard.clone(), h.store.clone(), h.in_flight.clone())
            .handle(&u, Role::Partner, cmd())
            .await
            .unwrap();
        let err = AdvanceTicketHandler::new(h.guard.clone(), h.store.clone(), h.in_flight.clone())
            .handle(
                &admin,
                AdvanceTicketCommand {
                    ticket_id: ticket.id,
                    status: TicketStatus::Resolved,
                    response: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn pending_partner_cannot_open_ticket() {
        let h = Harness::new();
        let (u, _) = h.partner("p1", AccountStatus::Pending).await;
        let err = OpenTicketHandler::new(h.guard.clone(), h.store.clone(), h.in_flight.clone())
            .handle(&u, Role::Partner, cmd())
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AccessDenied(_)));
    }
}
