//! SubmitFeatureRequestHandler - a partner asks for one of their listings to be featured.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::feature_request::{FeatureRequest, FeatureRequestStatus};
use crate::domain::foundation::{check_partner_ownership, AuthenticatedUser, PropertyId, Timestamp};
use crate::ports::{FeatureRequestRepository, PropertyRepository};

#[derive(Debug, Clone)]
pub struct SubmitFeatureRequestCommand {
    pub property_id: PropertyId,
    pub duration_days: u32,
    pub payment_method: String,
    pub remarks: Option<String>,
}

pub struct SubmitFeatureRequestHandler {
    guard: AccessGuard,
    properties: Arc<dyn PropertyRepository>,
    requests: Arc<dyn FeatureRequestRepository>,
    in_flight: InFlightRegistry,
}

impl SubmitFeatureRequestHandler {
    pub fn new(
        guard: AccessGuard,
        properties: Arc<dyn PropertyRepository>,
        requests: Arc<dyn FeatureRequestRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            properties,
            requests,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: SubmitFeatureRequestCommand,
    ) -> Result<FeatureRequest, WorkflowError> {
        // 1. Active owner of the listing
        let partner = self.guard.require_active_partner(actor).await?;
        let _token = self.in_flight.acquire("feature_request.submit", cmd.property_id)?;

        let property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Property", cmd.property_id))?;
        check_partner_ownership(&property, partner.id).into_result()?;

        // 2. One open request per listing
        let open = self
            .requests
            .list_by_partner(&partner.id)
            .await?
            .into_iter()
            .any(|r| r.property_id == property.id && r.status == FeatureRequestStatus::Pending);
        if open {
            return Err(WorkflowError::conflict(
                "A feature request for this property is already pending",
            ));
        }

        // 3. Create and persist
        let request = FeatureRequest::submit(
            property.id,
            partner.id,
            cmd.duration_days,
            &cmd.payment_method,
            cmd.remarks,
            Timestamp::now(),
        )?;
        self.requests.save(&request).await?;

        tracing::info!(
            request_id = %request.id,
            property_id = %property.id,
            duration_days = request.duration_days,
            "Feature request submitted"
        );
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Harness;
    use crate::domain::account::AccountStatus;

    fn handler(h: &Harness) -> SubmitFeatureRequestHandler {
        SubmitFeatureRequestHandler::new(
            h.guard.clone(),
            h.store.clone(),
            h.store.clone(),
            h.in_flight.clone(),
        )
    }

    fn cmd(property_id: PropertyId, days: u32) -> SubmitFeatureRequestCommand {
        SubmitFeatureRequestCommand {
            property_id,
            duration_days: days,
            payment_method: "bank transfer".to_string(),
            remarks: Some("  summer season ".to_string()),
        }
    }

    #[tokio::test]
    async fn owner_submits_pending_request() {
        let h = Harness::new();
        let (u, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;

        let request = handler(&h).handle(&u, cmd(property.id, 7)).await.unwrap();
        assert_eq!(request.status, FeatureRequestStatus::Pending);
        assert_eq!(request.remarks.as_deref(), Some("summer season"));
        assert_eq!(request.partner_id, partner.id);
    }

    #[tokio::test]
    async fn second_pending_request_conflicts() {
        let h = Harness::new();
        let (u, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        handler(&h).handle(&u, cmd(property.id, 7)).await.unwrap();
        let err = handler(&h).handle(&u, cmd(property.id, 3)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Conflict(_)));
    }

    #[tokio::test]
    async fn foreign_listing_is_forbidden() {
        let h = Harness::new();
        let (_, owner) = h.partner("p1", AccountStatus::Active).await;
        let (other, _) = h.partner("p2", AccountStatus::Active).await;
        let property = h.property(&owner).await;
        let err = handler(&h).handle(&other, cmd(property.id, 7)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn zero_days_is_validation_error() {
        let h = Harness::new();
        let (u, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        let err = handler(&h).handle(&u, cmd(property.id, 0)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { ref field, .. } if field == "duration_days"));
    }
}
