//! Feature request queues for administrators and partners.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::domain::feature_request::{FeatureRequest, FeatureRequestStatus};
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::FeatureRequestRepository;

pub struct ListFeatureRequestsHandler {
    guard: AccessGuard,
    requests: Arc<dyn FeatureRequestRepository>,
}

impl ListFeatureRequestsHandler {
    pub fn new(guard: AccessGuard, requests: Arc<dyn FeatureRequestRepository>) -> Self {
        Self { guard, requests }
    }

    /// Administrator queue, optionally filtered by status.
    pub async fn all(
        &self,
        actor: &AuthenticatedUser,
        status: Option<FeatureRequestStatus>,
    ) -> Result<Vec<FeatureRequest>, WorkflowError> {
        self.guard.require_admin(actor).await?;
        Ok(self.requests.list(status).await?)
    }

    /// The calling partner's own requests.
    pub async fn own(&self, actor: &AuthenticatedUser) -> Result<Vec<FeatureRequest>, WorkflowError> {
        let partner = self.guard.require_active_partner(actor).await?;
        Ok(self.requests.list_by_partner(&partner.id).await?)
    }
}
