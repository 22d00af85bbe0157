//! RejectFeatureRequestHandler - administrator declines a feature request.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::feature_request::FeatureRequest;
use crate::domain::foundation::{AuthenticatedUser, FeatureRequestId, Timestamp};
use crate::domain::notification::{NotificationKind, Recipient};
use crate::ports::FeatureRequestRepository;

#[derive(Debug, Clone)]
pub struct RejectFeatureRequestResult {
    pub request: FeatureRequest,
    pub notification_error: Option<String>,
}

pub struct RejectFeatureRequestHandler {
    guard: AccessGuard,
    requests: Arc<dyn FeatureRequestRepository>,
    notifier: Notifier,
    in_flight: InFlightRegistry,
}

impl RejectFeatureRequestHandler {
    pub fn new(
        guard: AccessGuard,
        requests: Arc<dyn FeatureRequestRepository>,
        notifier: Notifier,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            requests,
            notifier,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        request_id: FeatureRequestId,
    ) -> Result<RejectFeatureRequestResult, WorkflowError> {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("feature_request", request_id)?;

        let mut request = self
            .requests
            .find_by_id(&request_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("FeatureRequest", request_id))?;
        request.reject(&admin, Timestamp::now())?;
        self.requests.update(&request).await?;

        tracing::info!(
            request_id = %request.id,
            admin = %admin.user_id(),
            "Feature request rejected"
        );

        let notification_error = self
            .notifier
            .notify_best_effort(
                Recipient::Partner(request.partner_id),
                NotificationKind::FeatureRejected,
                "Feature request rejected",
                "Your feature request was not approved. Please contact support for details.",
            )
            .await;

        Ok(RejectFeatureRequestResult {
            request,
            notification_error,
        })
    }
}
