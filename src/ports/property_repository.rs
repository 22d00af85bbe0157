//! Property repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PartnerId, PropertyId};
use crate::domain::property::Property;

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn save(&self, property: &Property) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `NotFound` if the property does not exist
    async fn update(&self, property: &Property) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DomainError>;

    async fn list_by_partner(&self, partner_id: &PartnerId) -> Result<Vec<Property>, DomainError>;

    /// Every listing regardless of state. Callers apply the read gate.
    async fn list_all(&self) -> Result<Vec<Property>, DomainError>;
}
