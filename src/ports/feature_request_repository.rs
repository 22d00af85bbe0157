//! Feature request repository port.

use async_trait::async_trait;

use crate::domain::feature_request::{FeatureRequest, FeatureRequestStatus};
use crate::domain::foundation::{DomainError, FeatureRequestId, PartnerId};

#[async_trait]
pub trait FeatureRequestRepository: Send + Sync {
    async fn save(&self, request: &FeatureRequest) -> Result<(), DomainError>;

    /// Overwrites the stored request. Also used to restore a snapshot when an
    /// approval has to be compensated.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the request does not exist
    async fn update(&self, request: &FeatureRequest) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &FeatureRequestId)
        -> Result<Option<FeatureRequest>, DomainError>;

    async fn list_by_partner(&self, partner_id: &PartnerId)
        -> Result<Vec<FeatureRequest>, DomainError>;

    async fn list(&self, status: Option<FeatureRequestStatus>)
        -> Result<Vec<FeatureRequest>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_request_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn FeatureRequestRepository) {}
    }
}
