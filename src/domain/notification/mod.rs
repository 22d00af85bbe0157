//! Notification module - in-app messages for partners and agents.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AgentId, DomainError, ErrorCode, NotificationId, PartnerId, Timestamp,
};

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    Partner(PartnerId),
    Agent(AgentId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AccountReviewed,
    FeatureApproved,
    FeatureRejected,
    BookingReceived,
    BookingUpdated,
    CommissionUpdated,
    General,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AccountReviewed => "account_reviewed",
            NotificationKind::FeatureApproved => "feature_approved",
            NotificationKind::FeatureRejected => "feature_rejected",
            NotificationKind::BookingReceived => "booking_received",
            NotificationKind::BookingUpdated => "booking_updated",
            NotificationKind::CommissionUpdated => "commission_updated",
            NotificationKind::General => "general",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "account_reviewed" => NotificationKind::AccountReviewed,
            "feature_approved" => NotificationKind::FeatureApproved,
            "feature_rejected" => NotificationKind::FeatureRejected,
            "booking_received" => NotificationKind::BookingReceived,
            "booking_updated" => NotificationKind::BookingUpdated,
            "commission_updated" => NotificationKind::CommissionUpdated,
            _ => NotificationKind::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Unread,
    Read,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "unread",
            NotificationStatus::Read => "read",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unread" => Some(NotificationStatus::Unread),
            "read" => Some(NotificationStatus::Read),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: Recipient,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(
        recipient: Recipient,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            kind,
            title: title.into(),
            message: message.into(),
            status: NotificationStatus::Unread,
            created_at: now,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }

    /// Marks as read on behalf of `reader`, who must be the recipient.
    ///
    /// Reading twice is harmless.
    pub fn mark_read(&mut self, reader: Recipient) -> Result<(), DomainError> {
        if reader != self.recipient {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Notification belongs to another account",
            )
            .with_detail("notification_id", self.id.to_string()));
        }
        self.status = NotificationStatus::Read;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_marks_read() {
        let partner = Recipient::Partner(PartnerId::new());
        let mut n = Notification::new(
            partner,
            NotificationKind::General,
            "Hello",
            "Welcome aboard",
            Timestamp::now(),
        );
        assert!(n.is_unread());
        n.mark_read(partner).unwrap();
        assert!(!n.is_unread());
        n.mark_read(partner).unwrap();
    }

    #[test]
    fn others_cannot_mark_read() {
        let mut n = Notification::new(
            Recipient::Agent(AgentId::new()),
            NotificationKind::CommissionUpdated,
            "Paid",
            "Your commission was paid",
            Timestamp::now(),
        );
        let err = n.mark_read(Recipient::Agent(AgentId::new())).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(n.is_unread());
    }

    #[test]
    fn unknown_kind_parses_as_general() {
        assert_eq!(NotificationKind::parse("promo"), NotificationKind::General);
        assert_eq!(
            NotificationKind::parse("feature_approved"),
            NotificationKind::FeatureApproved
        );
    }
}
