//! RespondToBookingHandler - the owning partner confirms or declines.
//!
//! Confirming a booking for a referred partner derives the referring agent's
//! commission. A booking yields at most one commission: the status machine
//! refuses a second confirmation, the in-flight token rejects a concurrent
//! one, and an existing record for the booking is left alone.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::account::PartnerAccount;
use crate::domain::booking::{Booking, BookingResponse, BookingStatus};
use crate::domain::commission::{CommissionPolicy, CommissionRecord};
use crate::domain::foundation::{
    check_partner_ownership, AuthenticatedUser, BookingId, DomainError, Timestamp,
};
use crate::domain::notification::{NotificationKind, Recipient};
use crate::ports::{AgentRepository, BookingRepository, CommissionRepository, ReferralLinkRepository};

#[derive(Debug, Clone, Copy)]
pub struct RespondToBookingCommand {
    pub booking_id: BookingId,
    pub response: BookingResponse,
}

#[derive(Debug, Clone)]
pub struct RespondToBookingResult {
    pub booking: Booking,
    /// Commission created by this confirmation, if any.
    pub commission: Option<CommissionRecord>,
    pub notification_error: Option<String>,
}

pub struct RespondToBookingHandler {
    guard: AccessGuard,
    bookings: Arc<dyn BookingRepository>,
    links: Arc<dyn ReferralLinkRepository>,
    agents: Arc<dyn AgentRepository>,
    commissions: Arc<dyn CommissionRepository>,
    policy: CommissionPolicy,
    notifier: Notifier,
    in_flight: InFlightRegistry,
}

impl RespondToBookingHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        guard: AccessGuard,
        bookings: Arc<dyn BookingRepository>,
        links: Arc<dyn ReferralLinkRepository>,
        agents: Arc<dyn AgentRepository>,
        commissions: Arc<dyn CommissionRepository>,
        policy: CommissionPolicy,
        notifier: Notifier,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            bookings,
            links,
            agents,
            commissions,
            policy,
            notifier,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: RespondToBookingCommand,
    ) -> Result<RespondToBookingResult, WorkflowError> {
        // 1. Owning active partner
        let partner = self.guard.require_active_partner(actor).await?;
        let _token = self.in_flight.acquire("booking", cmd.booking_id)?;

        let mut booking = self
            .bookings
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Booking", cmd.booking_id))?;
        check_partner_ownership(&booking, partner.id).into_result()?;

        // 2. Transition and persist
        let status = booking.respond(cmd.response, Timestamp::now())?;
        self.bookings.update(&booking).await?;
        tracing::info!(
            booking_id = %booking.id,
            partner_id = %partner.id,
            status = status.as_str(),
            "Booking answered"
        );

        // 3. Commission for referred partners
        let commission = match status {
            BookingStatus::Confirmed => self.derive_commission(&partner, &booking).await?,
            _ => None,
        };

        // 4. Tell the referring agent
        let notification_error = match &commission {
            Some(record) => {
                let message = format!(
                    "A booking by one of your referred partners earned you {}.",
                    record.amount
                );
                self.notifier
                    .notify_best_effort(
                        Recipient::Agent(record.agent_id),
                        NotificationKind::CommissionUpdated,
                        "New commission",
                        &message,
                    )
                    .await
            }
            None => None,
        };

        Ok(RespondToBookingResult {
            booking,
            commission,
            notification_error,
        })
    }

    /// Runs after the booking is already confirmed, so any failure here is
    /// partial.
    async fn derive_commission(
        &self,
        partner: &PartnerAccount,
        booking: &Booking,
    ) -> Result<Option<CommissionRecord>, WorkflowError> {
        let partial = |e: DomainError| {
            tracing::error!(
                booking_id = %booking.id,
                error = %e,
                "Booking confirmed but commission was not recorded"
            );
            WorkflowError::partial_failure("derive_commission", e.to_string(), None)
        };

        let Some(link) = self.links.find_by_partner(&partner.id).await.map_err(partial)? else {
            return Ok(None);
        };
        if let Some(existing) = self
            .commissions
            .find_by_booking(&booking.id)
            .await
            .map_err(partial)?
        {
            tracing::warn!(
                booking_id = %booking.id,
                commission_id = %existing.id,
                "Commission already recorded for booking"
            );
            return Ok(None);
        }
        let Some(agent) = self.agents.find_by_id(&link.agent_id).await.map_err(partial)? else {
            tracing::warn!(
                booking_id = %booking.id,
                agent_id = %link.agent_id,
                "Referral link points at a missing agent"
            );
            return Ok(None);
        };

        let rate = self.policy.referral_rate_for(&agent);
        let record = CommissionRecord::derive(booking, &link, rate, Timestamp::now())?;
        self.commissions.save(&record).await.map_err(partial)?;

        tracing::info!(
            booking_id = %booking.id,
            agent_id = %agent.id,
            rate = %record.rate,
            amount = %record.amount,
            "Commission recorded"
        );
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{user, Harness};
    use crate::domain::account::{AccountStatus, ReferralAgent, ReferralLink};
    use crate::domain::booking::{GuestContact, StayDates};
    use crate::domain::commission::{CommissionStatus, RateSource};
    use crate::domain::foundation::{Money, Percentage};
    use crate::domain::property::Property;
    use chrono::NaiveDate;

    fn handler(h: &Harness, policy: CommissionPolicy) -> RespondToBookingHandler {
        RespondToBookingHandler::new(
            h.guard.clone(),
            h.store.clone(),
            h.store.clone(),
            h.store.clone(),
            h.store.clone(),
            policy,
            h.notifier.clone(),
            h.in_flight.clone(),
        )
    }

    async fn booking_for(h: &Harness, property: &Property) -> Booking {
        let stay = StayDates::from_dates(
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
        )
        .unwrap();
        let booking = Booking::request(
            property,
            GuestContact {
                name: "Guest".to_string(),
                email: "guest@example.com".to_string(),
                phone: None,
            },
            stay,
            2,
            Timestamp::now(),
        )
        .unwrap();
        BookingRepository::save(h.store.as_ref(), &booking)
            .await
            .unwrap();
        booking
    }

    /// Referred partner with one pending booking (2 nights at 5,000).
    async fn referred(h: &Harness) -> (AuthenticatedUser, Booking, ReferralAgent) {
        let (_, agent) = h.agent("a1", AccountStatus::Active).await;
        let (u, partner) = h.partner("p1", AccountStatus::Active).await;
        let link = ReferralLink::new(
            partner.id,
            agent.id,
            agent.referral_code.clone(),
            Timestamp::now(),
        );
        ReferralLinkRepository::save(h.store.as_ref(), &link)
            .await
            .unwrap();
        let property = h.property(&partner).await;
        let booking = booking_for(h, &property).await;
        (u, booking, agent)
    }

    async fn commissions_of(h: &Harness, agent: &ReferralAgent) -> usize {
        CommissionRepository::list_by_agent(h.store.as_ref(), &agent.id)
            .await
            .unwrap()
            .len()
    }

    fn confirm(id: BookingId) -> RespondToBookingCommand {
        RespondToBookingCommand {
            booking_id: id,
            response: BookingResponse::Confirm,
        }
    }

    #[tokio::test]
    async fn confirming_referred_booking_records_commission() {
        let h = Harness::new();
        let (u, booking, agent) = referred(&h).await;

        let result = handler(&h, CommissionPolicy::default())
            .handle(&u, confirm(booking.id))
            .await
            .unwrap();

        assert_eq!(result.booking.status, BookingStatus::Confirmed);
        let record = result.commission.unwrap();
        assert_eq!(record.agent_id, agent.id);
        assert_eq!(record.booking_amount, Money::new(10_000));
        assert_eq!(record.amount, Money::new(1_000));
        assert_eq!(record.status, CommissionStatus::Pending);
        assert_eq!(h.store.notification_count(&Recipient::Agent(agent.id)), 1);
    }

    #[tokio::test]
    async fn agent_rate_source_uses_agent_rate() {
        let h = Harness::new();
        let (u, booking, mut agent) = referred(&h).await;
        agent.commission_rate = Percentage::clamped(20);
        AgentRepository::update(h.store.as_ref(), &agent).await.unwrap();
        let policy = CommissionPolicy {
            referral_rate_source: RateSource::Agent,
            ..CommissionPolicy::default()
        };

        let result = handler(&h, policy)
            .handle(&u, confirm(booking.id))
            .await
            .unwrap();
        assert_eq!(result.commission.unwrap().amount, Money::new(2_000));
    }

    #[tokio::test]
    async fn second_confirmation_is_refused_and_no_duplicate() {
        let h = Harness::new();
        let (u, booking, agent) = referred(&h).await;
        let handler = handler(&h, CommissionPolicy::default());
        handler.handle(&u, confirm(booking.id)).await.unwrap();

        let err = handler.handle(&u, confirm(booking.id)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
        assert_eq!(commissions_of(&h, &agent).await, 1);
    }

    #[tokio::test]
    async fn existing_commission_is_not_duplicated() {
        let h = Harness::new();
        let (u, booking, agent) = referred(&h).await;
        let mut confirmed = booking.clone();
        confirmed.respond(BookingResponse::Confirm, Timestamp::now()).unwrap();
        let link = h.store.find_by_partner(&booking.partner_id).await.unwrap().unwrap();
        let earlier =
            CommissionRecord::derive(&confirmed, &link, Percentage::clamped(10), Timestamp::now())
                .unwrap();
        CommissionRepository::save(h.store.as_ref(), &earlier)
            .await
            .unwrap();

        let result = handler(&h, CommissionPolicy::default())
            .handle(&u, confirm(booking.id))
            .await
            .unwrap();
        assert!(result.commission.is_none());
        assert_eq!(commissions_of(&h, &agent).await, 1);
    }

    #[tokio::test]
    async fn unreferred_partner_earns_no_commission() {
        let h = Harness::new();
        let (u, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        let booking = booking_for(&h, &property).await;

        let result = handler(&h, CommissionPolicy::default())
            .handle(&u, confirm(booking.id))
            .await
            .unwrap();
        assert!(result.commission.is_none());
    }

    #[tokio::test]
    async fn decline_creates_no_commission() {
        let h = Harness::new();
        let (u, booking, agent) = referred(&h).await;
        let result = handler(&h, CommissionPolicy::default())
            .handle(
                &u,
                RespondToBookingCommand {
                    booking_id: booking.id,
                    response: BookingResponse::Decline,
                },
            )
            .await
            .unwrap();
        assert_eq!(result.booking.status, BookingStatus::Declined);
        assert!(result.commission.is_none());
        assert_eq!(commissions_of(&h, &agent).await, 0);
    }

    #[tokio::test]
    async fn other_partner_cannot_respond() {
        let h = Harness::new();
        let (_, booking, _) = referred(&h).await;
        let (intruder, _) = h.partner("p2", AccountStatus::Active).await;
        let err = handler(&h, CommissionPolicy::default())
            .handle(&intruder, confirm(booking.id))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn commission_write_failure_is_partial() {
        let h = Harness::new();
        let (u, booking, _) = referred(&h).await;
        h.store.fail_on("commission.save");
        let err = handler(&h, CommissionPolicy::default())
            .handle(&u, confirm(booking.id))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::PartialFailure { step: "derive_commission", .. }));
        let stored = BookingRepository::find_by_id(h.store.as_ref(), &booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn non_partner_is_forbidden() {
        let h = Harness::new();
        let (_, booking, _) = referred(&h).await;
        let err = handler(&h, CommissionPolicy::default())
            .handle(&user("stranger"), confirm(booking.id))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
