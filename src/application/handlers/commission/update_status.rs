//! UpdateCommissionStatusHandler - administrator settles or rejects a commission.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::commission::{CommissionRecord, CommissionStatus};
use crate::domain::foundation::{AuthenticatedUser, CommissionId, Timestamp};
use crate::domain::notification::{NotificationKind, Recipient};
use crate::ports::CommissionRepository;

#[derive(Debug, Clone, Copy)]
pub struct UpdateCommissionStatusCommand {
    pub commission_id: CommissionId,
    pub status: CommissionStatus,
}

#[derive(Debug, Clone)]
pub struct UpdateCommissionStatusResult {
    pub commission: CommissionRecord,
    pub notification_error: Option<String>,
}

pub struct UpdateCommissionStatusHandler {
    guard: AccessGuard,
    commissions: Arc<dyn CommissionRepository>,
    notifier: Notifier,
    in_flight: InFlightRegistry,
}

impl UpdateCommissionStatusHandler {
    pub fn new(
        guard: AccessGuard,
        commissions: Arc<dyn CommissionRepository>,
        notifier: Notifier,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            commissions,
            notifier,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: UpdateCommissionStatusCommand,
    ) -> Result<UpdateCommissionStatusResult, WorkflowError> {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("commission", cmd.commission_id)?;

        let mut commission = self
            .commissions
            .find_by_id(&cmd.commission_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Commission", cmd.commission_id))?;
        let previous = commission.status;
        commission.move_to(cmd.status, &admin, Timestamp::now())?;
        self.commissions.update(&commission).await?;

        tracing::info!(
            commission_id = %commission.id,
            admin = %admin.user_id(),
            from = previous.as_str(),
            to = commission.status.as_str(),
            "Commission status changed"
        );

        let message = format!(
            "Your commission of {} is now {}.",
            commission.amount,
            commission.status.as_str()
        );
        let notification_error = self
            .notifier
            .notify_best_effort(
                Recipient::Agent(commission.agent_id),
                NotificationKind::CommissionUpdated,
                "Commission updated",
                &message,
            )
            .await;

        Ok(UpdateCommissionStatusResult {
            commission,
            notification_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Harness;
    use crate::domain::account::{AccountStatus, ReferralLink};
    use crate::domain::booking::{Booking, BookingResponse, GuestContact, StayDates};
    use crate::domain::foundation::Percentage;
    use chrono::NaiveDate;

    async fn pending_commission(h: &Harness) -> CommissionRecord {
        let (_, agent) = h.agent("a1", AccountStatus::Active).await;
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        let mut booking = Booking::request(
            &property,
            GuestContact {
                name: "Guest".to_string(),
                email: "g@example.com".to_string(),
                phone: None,
            },
            StayDates::from_dates(
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
            )
            .unwrap(),
            2,
            Timestamp::now(),
        )
        .unwrap();
        booking.respond(BookingResponse::Confirm, Timestamp::now()).unwrap();
        let link = ReferralLink::new(partner.id, agent.id, agent.referral_code, Timestamp::now());
        let record =
            CommissionRecord::derive(&booking, &link, Percentage::clamped(10), Timestamp::now())
                .unwrap();
        h.store.save(&record).await.unwrap();
        record
    }

    fn handler(h: &Harness) -> UpdateCommissionStatusHandler {
        UpdateCommissionStatusHandler::new(
            h.guard.clone(),
            h.store.clone(),
            h.notifier.clone(),
            h.in_flight.clone(),
        )
    }

    fn to(record: &CommissionRecord, status: CommissionStatus) -> UpdateCommissionStatusCommand {
        UpdateCommissionStatusCommand {
            commission_id: record.id,
            status,
        }
    }

    #[tokio::test]
    async fn pending_to_processing_to_paid() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let record = pending_commission(&h).await;
        let handler = handler(&h);

        handler
            .handle(&admin, to(&record, CommissionStatus::Processing))
            .await
            .unwrap();
        let paid = handler
            .handle(&admin, to(&record, CommissionStatus::Paid))
            .await
            .unwrap();

        assert_eq!(paid.commission.status, CommissionStatus::Paid);
        assert_eq!(paid.commission.updated_by.as_ref(), Some(&admin.id));
        assert_eq!(h.store.notification_count(&Recipient::Agent(record.agent_id)), 2);
    }

    #[tokio::test]
    async fn pending_cannot_jump_to_paid() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let record = pending_commission(&h).await;
        let err = handler(&h)
            .handle(&admin, to(&record, CommissionStatus::Paid))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn agent_cannot_change_status() {
        let h = Harness::new();
        let record = pending_commission(&h).await;
        let (agent_user, _) = h.agent("a2", AccountStatus::Active).await;
        let err = handler(&h)
            .handle(&agent_user, to(&record, CommissionStatus::Processing))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
