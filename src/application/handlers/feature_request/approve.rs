//! ApproveFeatureRequestHandler - the approval saga.
//!
//! Steps:
//! 1. mark the request approved and persist it
//! 2. compute the window `[now, now + duration_days]`
//! 3. persist the window onto the property
//! 4. notify the partner
//!
//! When step 3 fails the request row is restored from the snapshot taken
//! before step 1. If the restore fails too, the caller gets a
//! `PartialFailure` naming both steps. Step 4 never rolls anything back; its
//! failure is reported in [`ApproveFeatureRequestResult::notification_error`].

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::feature_request::FeatureRequest;
use crate::domain::foundation::{AuthenticatedUser, FeatureRequestId, Timestamp};
use crate::domain::notification::{NotificationKind, Recipient};
use crate::domain::property::Property;
use crate::ports::{FeatureRequestRepository, PropertyRepository};

#[derive(Debug, Clone)]
pub struct ApproveFeatureRequestResult {
    pub request: FeatureRequest,
    pub property: Property,
    pub notification_error: Option<String>,
}

pub struct ApproveFeatureRequestHandler {
    guard: AccessGuard,
    requests: Arc<dyn FeatureRequestRepository>,
    properties: Arc<dyn PropertyRepository>,
    notifier: Notifier,
    in_flight: InFlightRegistry,
}

impl ApproveFeatureRequestHandler {
    pub fn new(
        guard: AccessGuard,
        requests: Arc<dyn FeatureRequestRepository>,
        properties: Arc<dyn PropertyRepository>,
        notifier: Notifier,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            requests,
            properties,
            notifier,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        request_id: FeatureRequestId,
    ) -> Result<ApproveFeatureRequestResult, WorkflowError> {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("feature_request", request_id)?;

        let mut request = self
            .requests
            .find_by_id(&request_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("FeatureRequest", request_id))?;
        // Held through the property write so no other writer interleaves.
        let _property_token = self.in_flight.acquire("property", request.property_id)?;
        let mut property = self
            .properties
            .find_by_id(&request.property_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Property", request.property_id))?;
        let snapshot = request.clone();
        let now = Timestamp::now();

        // 1. Mark approved
        request.approve(&admin, now)?;
        self.requests.update(&request).await?;

        // 2 + 3. Compute and persist the window
        let applied = match property.feature_for(request.duration_days, now) {
            Ok(_) => self
                .properties
                .update(&property)
                .await
                .map_err(WorkflowError::from),
            Err(e) => Err(WorkflowError::from(e)),
        };
        if let Err(cause) = applied {
            return Err(self.compensate(&snapshot, cause).await);
        }

        tracing::info!(
            request_id = %request.id,
            property_id = %property.id,
            admin = %admin.user_id(),
            feature_end = ?property.feature.map(|w| w.end()),
            "Feature request approved"
        );

        // 4. Tell the partner
        let message = format!(
            "Your property \"{}\" is featured for {} days.",
            property.details.name, request.duration_days
        );
        let notification_error = self
            .notifier
            .notify_best_effort(
                Recipient::Partner(request.partner_id),
                NotificationKind::FeatureApproved,
                "Feature request approved",
                &message,
            )
            .await;

        Ok(ApproveFeatureRequestResult {
            request,
            property,
            notification_error,
        })
    }

    /// Restores the request row after the property write failed.
    async fn compensate(&self, snapshot: &FeatureRequest, cause: WorkflowError) -> WorkflowError {
        tracing::warn!(
            request_id = %snapshot.id,
            error = %cause,
            "Property update failed, restoring feature request"
        );
        match self.requests.update(snapshot).await {
            Ok(()) => cause,
            Err(restore) => {
                tracing::error!(
                    request_id = %snapshot.id,
                    property_id = %snapshot.property_id,
                    error = %cause,
                    restore_error = %restore,
                    "Feature request left approved without a feature window"
                );
                WorkflowError::partial_failure(
                    "update_property",
                    cause.to_string(),
                    Some(format!("restore_feature_request: {}", restore)),
                )
            }
        }
    }
}
