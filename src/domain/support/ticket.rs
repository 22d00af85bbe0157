//! Support tickets opened by partners and agents.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    require_text, StateMachine, SupportTicketId, Timestamp, TransitionError, UserId,
    ValidationError,
};
use crate::domain::notification::Recipient;
use crate::domain::session::Administrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(TicketStatus::Open),
            "in_progress" => Some(TicketStatus::InProgress),
            "resolved" => Some(TicketStatus::Resolved),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}

impl StateMachine for TicketStatus {
    const ENTITY: &'static str = "support ticket";

    fn valid_transitions(&self) -> Vec<Self> {
        use TicketStatus::*;
        match self {
            Open => vec![InProgress, Closed],
            InProgress => vec![Resolved, Closed],
            Resolved => vec![Closed],
            Closed => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: SupportTicketId,
    /// Partner or agent account that opened the ticket.
    pub requester: Recipient,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub admin_response: Option<String>,
    pub handled_by: Option<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SupportTicket {
    pub fn open(
        requester: Recipient,
        subject: &str,
        message: &str,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: SupportTicketId::new(),
            requester,
            subject: require_text("subject", subject)?,
            message: require_text("message", message)?,
            status: TicketStatus::Open,
            admin_response: None,
            handled_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Moves the ticket on, optionally replacing the admin response.
    pub fn advance(
        &mut self,
        target: TicketStatus,
        response: Option<String>,
        admin: &Administrator,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.status = self.status.transition_to(target)?;
        if let Some(response) = response.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
            self.admin_response = Some(response);
        }
        self.handled_by = Some(admin.user_id().clone());
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PartnerId;

    fn admin() -> Administrator {
        Administrator::new(UserId::new("admin").unwrap())
    }

    fn ticket() -> SupportTicket {
        SupportTicket::open(
            Recipient::Partner(PartnerId::new()),
            "Payout missing",
            "March payout never arrived",
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn full_lifecycle() {
        let mut t = ticket();
        t.advance(TicketStatus::InProgress, None, &admin(), Timestamp::now())
            .unwrap();
        t.advance(
            TicketStatus::Resolved,
            Some("Re-sent the payout".to_string()),
            &admin(),
            Timestamp::now(),
        )
        .unwrap();
        t.advance(TicketStatus::Closed, None, &admin(), Timestamp::now())
            .unwrap();
        assert_eq!(t.admin_response.as_deref(), Some("Re-sent the payout"));
        assert!(t.status.is_terminal());
    }

    #[test]
    fn open_ticket_cannot_jump_to_resolved() {
        let mut t = ticket();
        assert!(t
            .advance(TicketStatus::Resolved, None, &admin(), Timestamp::now())
            .is_err());
    }

    #[test]
    fn blank_subject_is_rejected() {
        assert!(SupportTicket::open(
            Recipient::Partner(PartnerId::new()),
            " ",
            "body",
            Timestamp::now()
        )
        .is_err());
    }
}
