//! Dashboard reads: revenue and earnings reports plus commission lists.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::domain::commission::{
    AgentEarningsReport, CommissionPolicy, CommissionRecord, CommissionStatus,
    PartnerRevenueReport,
};
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::{BookingRepository, CommissionRepository, ReferralLinkRepository};

pub struct PartnerRevenueReportHandler {
    guard: AccessGuard,
    bookings: Arc<dyn BookingRepository>,
    policy: CommissionPolicy,
}

impl PartnerRevenueReportHandler {
    pub fn new(
        guard: AccessGuard,
        bookings: Arc<dyn BookingRepository>,
        policy: CommissionPolicy,
    ) -> Self {
        Self {
            guard,
            bookings,
            policy,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<PartnerRevenueReport, WorkflowError> {
        let partner = self.guard.require_active_partner(actor).await?;
        let bookings = self.bookings.list_by_partner(&partner.id).await?;
        Ok(PartnerRevenueReport::build(&bookings, &self.policy))
    }
}

pub struct AgentEarningsReportHandler {
    guard: AccessGuard,
    links: Arc<dyn ReferralLinkRepository>,
    commissions: Arc<dyn CommissionRepository>,
}

impl AgentEarningsReportHandler {
    pub fn new(
        guard: AccessGuard,
        links: Arc<dyn ReferralLinkRepository>,
        commissions: Arc<dyn CommissionRepository>,
    ) -> Self {
        Self {
            guard,
            links,
            commissions,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<AgentEarningsReport, WorkflowError> {
        let agent = self.guard.require_active_agent(actor).await?;
        let referred = self.links.list_by_agent(&agent.id).await?;
        let records = self.commissions.list_by_agent(&agent.id).await?;
        Ok(AgentEarningsReport::build(referred.len(), &records))
    }
}

pub struct ListCommissionsHandler {
    guard: AccessGuard,
    commissions: Arc<dyn CommissionRepository>,
}

impl ListCommissionsHandler {
    pub fn new(guard: AccessGuard, commissions: Arc<dyn CommissionRepository>) -> Self {
        Self { guard, commissions }
    }

    /// The calling agent's commissions.
    pub async fn own(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<CommissionRecord>, WorkflowError> {
        let agent = self.guard.require_active_agent(actor).await?;
        Ok(self.commissions.list_by_agent(&agent.id).await?)
    }

    pub async fn all(
        &self,
        actor: &AuthenticatedUser,
        status: Option<CommissionStatus>,
    ) -> Result<Vec<CommissionRecord>, WorkflowError> {
        self.guard.require_admin(actor).await?;
        let records = self.commissions.list_all().await?;
        Ok(match status {
            Some(status) => records.into_iter().filter(|r| r.status == status).collect(),
            None => records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Harness;
    use crate::domain::account::{AccountStatus, ReferralLink};
    use crate::domain::booking::{Booking, BookingResponse, GuestContact, StayDates};
    use crate::domain::foundation::{Money, Percentage, Timestamp};
    use crate::domain::property::Property;
    use crate::domain::session::Administrator;
    use chrono::NaiveDate;

    async fn booking(h: &Harness, property: &Property, nights: u32, confirm: bool) -> Booking {
        let mut booking = Booking::request(
            property,
            GuestContact {
                name: "Guest".to_string(),
                email: "g@example.com".to_string(),
                phone: None,
            },
            StayDates::from_dates(
                NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 1 + nights).unwrap(),
            )
            .unwrap(),
            1,
            Timestamp::now(),
        )
        .unwrap();
        if confirm {
            booking.respond(BookingResponse::Confirm, Timestamp::now()).unwrap();
        }
        BookingRepository::save(h.store.as_ref(), &booking)
            .await
            .unwrap();
        booking
    }

    #[tokio::test]
    async fn partner_revenue_counts_confirmed_only() {
        let h = Harness::new();
        let (u, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        booking(&h, &property, 2, true).await;
        booking(&h, &property, 4, false).await;

        let report = PartnerRevenueReportHandler::new(
            h.guard.clone(),
            h.store.clone(),
            CommissionPolicy::default(),
        )
        .handle(&u)
        .await
        .unwrap();

        assert_eq!(report.confirmed_bookings, 1);
        assert_eq!(report.gross, Money::new(10_000));
        assert_eq!(report.platform_commission, Money::new(1_500));
        assert_eq!(report.net, Money::new(8_500));
    }

    #[tokio::test]
    async fn agent_earnings_split_by_status() {
        let h = Harness::new();
        let admin = Administrator::new(h.admin("boss").await.id);
        let (agent_user, agent) = h.agent("a1", AccountStatus::Active).await;
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let link = ReferralLink::new(partner.id, agent.id, agent.referral_code.clone(), Timestamp::now());
        ReferralLinkRepository::save(h.store.as_ref(), &link)
            .await
            .unwrap();
        let property = h.property(&partner).await;

        for (nights, settle) in [(1, false), (2, true)] {
            let confirmed = booking(&h, &property, nights, true).await;
            let mut record =
                CommissionRecord::derive(&confirmed, &link, Percentage::clamped(10), Timestamp::now())
                    .unwrap();
            if settle {
                record
                    .move_to(CommissionStatus::Processing, &admin, Timestamp::now())
                    .unwrap();
                record
                    .move_to(CommissionStatus::Paid, &admin, Timestamp::now())
                    .unwrap();
            }
            CommissionRepository::save(h.store.as_ref(), &record)
                .await
                .unwrap();
        }

        let report = AgentEarningsReportHandler::new(
            h.guard.clone(),
            h.store.clone(),
            h.store.clone(),
        )
        .handle(&agent_user)
        .await
        .unwrap();

        assert_eq!(report.referred_partners, 1);
        assert_eq!(report.pending, Money::new(500));
        assert_eq!(report.paid, Money::new(1_000));
        assert_eq!(report.total, Money::new(1_500));

        let lists = ListCommissionsHandler::new(h.guard.clone(), h.store.clone());
        assert_eq!(lists.own(&agent_user).await.unwrap().len(), 2);
        let paid = lists
            .all(&h.admin("boss").await, Some(CommissionStatus::Paid))
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
    }

    #[tokio::test]
    async fn pending_agent_cannot_read_earnings() {
        let h = Harness::new();
        let (agent_user, _) = h.agent("a1", AccountStatus::Pending).await;
        let err = AgentEarningsReportHandler::new(h.guard.clone(), h.store.clone(), h.store.clone())
            .handle(&agent_user)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AccessDenied(_)));
    }
}
