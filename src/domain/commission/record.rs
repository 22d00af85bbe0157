//! Commission records derived from confirmed bookings.

use serde::{Deserialize, Serialize};

use crate::domain::account::ReferralLink;
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{
    AgentId, BookingId, CommissionId, Money, PartnerId, Percentage, StateMachine, Timestamp,
    TransitionError, UserId, ValidationError,
};
use crate::domain::session::Administrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Pending,
    Processing,
    Paid,
    Rejected,
}

impl CommissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Processing => "processing",
            CommissionStatus::Paid => "paid",
            CommissionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(CommissionStatus::Pending),
            "processing" => Some(CommissionStatus::Processing),
            "paid" => Some(CommissionStatus::Paid),
            "rejected" => Some(CommissionStatus::Rejected),
            _ => None,
        }
    }

    /// Owed but not yet settled.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, CommissionStatus::Pending | CommissionStatus::Processing)
    }
}

impl StateMachine for CommissionStatus {
    const ENTITY: &'static str = "commission";

    fn valid_transitions(&self) -> Vec<Self> {
        use CommissionStatus::*;
        match self {
            Pending => vec![Processing, Rejected],
            Processing => vec![Paid, Rejected],
            Paid | Rejected => vec![],
        }
    }
}

/// Commission owed to a referring agent for one booking.
///
/// # Invariants
///
/// - at most one record per `booking_id`
/// - `amount == booking_amount * rate`, fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRecord {
    pub id: CommissionId,
    pub agent_id: AgentId,
    pub partner_id: PartnerId,
    pub booking_id: BookingId,
    pub booking_amount: Money,
    pub rate: Percentage,
    pub amount: Money,
    pub status: CommissionStatus,
    pub updated_by: Option<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CommissionRecord {
    /// Derives the commission for a confirmed booking on a referred partner.
    pub fn derive(
        booking: &Booking,
        link: &ReferralLink,
        rate: Percentage,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if booking.status != BookingStatus::Confirmed {
            return Err(ValidationError::invalid_format(
                "booking_status",
                "commission requires a confirmed booking",
            ));
        }
        if link.partner_id != booking.partner_id {
            return Err(ValidationError::invalid_format(
                "referral_link",
                "link belongs to another partner",
            ));
        }
        Ok(Self {
            id: CommissionId::new(),
            agent_id: link.agent_id,
            partner_id: booking.partner_id,
            booking_id: booking.id,
            booking_amount: booking.total_price,
            rate,
            amount: booking.total_price.percent_of(rate),
            status: CommissionStatus::Pending,
            updated_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn move_to(
        &mut self,
        target: CommissionStatus,
        admin: &Administrator,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.status = self.status.transition_to(target)?;
        self.updated_by = Some(admin.user_id().clone());
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::ReferralCode;
    use crate::domain::booking::{BookingResponse, GuestContact, StayDates};
    use crate::domain::property::{sample_details, Property};
    use chrono::NaiveDate;

    fn confirmed_booking() -> Booking {
        let property = Property::create(PartnerId::new(), sample_details(), Timestamp::now()).unwrap();
        let mut booking = Booking::request(
            &property,
            GuestContact {
                name: "G".to_string(),
                email: "g@example.com".to_string(),
                phone: None,
            },
            StayDates::from_dates(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            )
            .unwrap(),
            2,
            Timestamp::now(),
        )
        .unwrap();
        booking.respond(BookingResponse::Confirm, Timestamp::now()).unwrap();
        booking
    }

    fn link_for(booking: &Booking) -> ReferralLink {
        ReferralLink::new(
            booking.partner_id,
            AgentId::new(),
            ReferralCode::generate(),
            Timestamp::now(),
        )
    }

    #[test]
    fn ten_percent_of_fifteen_thousand() {
        let booking = confirmed_booking();
        let record = CommissionRecord::derive(
            &booking,
            &link_for(&booking),
            Percentage::clamped(10),
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(record.amount, Money::new(1_500));
        assert_eq!(record.booking_amount, Money::new(15_000));
        assert_eq!(record.status, CommissionStatus::Pending);
    }

    #[test]
    fn pending_booking_yields_no_commission() {
        let mut booking = confirmed_booking();
        booking.status = BookingStatus::Pending;
        assert!(CommissionRecord::derive(
            &booking,
            &link_for(&booking),
            Percentage::clamped(10),
            Timestamp::now()
        )
        .is_err());
    }

    #[test]
    fn payout_lifecycle() {
        let admin = Administrator::new(UserId::new("admin").unwrap());
        let booking = confirmed_booking();
        let mut record = CommissionRecord::derive(
            &booking,
            &link_for(&booking),
            Percentage::clamped(10),
            Timestamp::now(),
        )
        .unwrap();
        assert!(record
            .move_to(CommissionStatus::Paid, &admin, Timestamp::now())
            .is_err());
        record
            .move_to(CommissionStatus::Processing, &admin, Timestamp::now())
            .unwrap();
        record
            .move_to(CommissionStatus::Paid, &admin, Timestamp::now())
            .unwrap();
        assert!(record.status.is_terminal());
    }
}
