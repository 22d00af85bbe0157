//! Support ticket and review repository ports.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PropertyId, ReviewId, SupportTicketId};
use crate::domain::notification::Recipient;
use crate::domain::support::{Review, SupportTicket};

#[async_trait]
pub trait SupportTicketRepository: Send + Sync {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError>;

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SupportTicketId) -> Result<Option<SupportTicket>, DomainError>;

    async fn list_for(&self, requester: &Recipient) -> Result<Vec<SupportTicket>, DomainError>;

    async fn list_all(&self) -> Result<Vec<SupportTicket>, DomainError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn save(&self, review: &Review) -> Result<(), DomainError>;

    async fn update(&self, review: &Review) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError>;

    async fn list_by_property(&self, property_id: &PropertyId) -> Result<Vec<Review>, DomainError>;

    async fn list_all(&self) -> Result<Vec<Review>, DomainError>;
}
