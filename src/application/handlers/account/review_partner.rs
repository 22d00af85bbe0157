//! ReviewPartnerHandler - administrator approves, rejects or suspends a partner.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::account::{AccountDecision, PartnerAccount};
use crate::domain::foundation::{AuthenticatedUser, PartnerId, Timestamp};
use crate::domain::notification::{NotificationKind, Recipient};
use crate::ports::PartnerRepository;

use super::review_message;

#[derive(Debug, Clone)]
pub struct ReviewPartnerCommand {
    pub partner_id: PartnerId,
    pub decision: AccountDecision,
}

#[derive(Debug, Clone)]
pub struct ReviewPartnerResult {
    pub partner: PartnerAccount,
    /// Set when the account changed but the partner was not told.
    pub notification_error: Option<String>,
}

pub struct ReviewPartnerHandler {
    guard: AccessGuard,
    partners: Arc<dyn PartnerRepository>,
    notifier: Notifier,
    in_flight: InFlightRegistry,
}

impl ReviewPartnerHandler {
    pub fn new(
        guard: AccessGuard,
        partners: Arc<dyn PartnerRepository>,
        notifier: Notifier,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            partners,
            notifier,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: ReviewPartnerCommand,
    ) -> Result<ReviewPartnerResult, WorkflowError> {
        // 1. Only administrators move account status
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("partner", cmd.partner_id)?;

        // 2. Load and transition
        let mut partner = self
            .partners
            .find_by_id(&cmd.partner_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Partner", cmd.partner_id))?;
        let previous = partner.status;
        let status = partner.review(cmd.decision, &admin, Timestamp::now())?;

        // 3. Persist
        self.partners.update(&partner).await?;
        tracing::info!(
            partner_id = %partner.id,
            admin = %admin.user_id(),
            from = previous.as_str(),
            to = status.as_str(),
            "Partner account reviewed"
        );

        // 4. Tell the partner
        let (title, message) = review_message(status);
        let notification_error = self
            .notifier
            .notify_best_effort(
                Recipient::Partner(partner.id),
                NotificationKind::AccountReviewed,
                title,
                message,
            )
            .await;

        Ok(ReviewPartnerResult {
            partner,
            notification_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{user, Harness};
    use crate::domain::account::AccountStatus;

    fn handler(h: &Harness) -> ReviewPartnerHandler {
        ReviewPartnerHandler::new(
            h.guard.clone(),
            h.store.clone(),
            h.notifier.clone(),
            h.in_flight.clone(),
        )
    }

    #[tokio::test]
    async fn admin_approves_pending_partner_and_notifies() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let (_, partner) = h.partner("p1", AccountStatus::Pending).await;

        let result = handler(&h)
            .handle(
                &admin,
                ReviewPartnerCommand {
                    partner_id: partner.id,
                    decision: AccountDecision::Approve,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.partner.status, AccountStatus::Active);
        assert_eq!(result.partner.reviewed_by.as_ref(), Some(&admin.id));
        assert!(result.notification_error.is_none());
        assert_eq!(h.store.notification_count(&Recipient::Partner(partner.id)), 1);
        let stored = h.store.find_by_id(&partner.id).await.unwrap().unwrap();
        assert_eq!(stored.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn non_admin_cannot_review() {
        let h = Harness::new();
        let (partner_user, partner) = h.partner("p1", AccountStatus::Active).await;
        let err = handler(&h)
            .handle(
                &partner_user,
                ReviewPartnerCommand {
                    partner_id: partner.id,
                    decision: AccountDecision::Suspend,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn rejected_partner_cannot_be_reinstated() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let (_, partner) = h.partner("p1", AccountStatus::Rejected).await;
        let err = handler(&h)
            .handle(
                &admin,
                ReviewPartnerCommand {
                    partner_id: partner.id,
                    decision: AccountDecision::Approve,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn notification_failure_keeps_review() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        h.store.fail_on("notification.save");

        let result = handler(&h)
            .handle(
                &admin,
                ReviewPartnerCommand {
                    partner_id: partner.id,
                    decision: AccountDecision::Suspend,
                },
            )
            .await
            .unwrap();
        assert_eq!(result.partner.status, AccountStatus::Suspended);
        assert!(result.notification_error.is_some());
    }

    #[tokio::test]
    async fn unknown_partner_is_not_found() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let err = handler(&h)
            .handle(
                &admin,
                ReviewPartnerCommand {
                    partner_id: PartnerId::new(),
                    decision: AccountDecision::Approve,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { entity: "Partner", .. }));
    }

    #[tokio::test]
    async fn unrelated_user_is_forbidden() {
        let h = Harness::new();
        let (_, partner) = h.partner("p1", AccountStatus::Pending).await;
        let err = handler(&h)
            .handle(
                &user("stranger"),
                ReviewPartnerCommand {
                    partner_id: partner.id,
                    decision: AccountDecision::Approve,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
