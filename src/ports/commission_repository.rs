//! Commission record repository port.

use async_trait::async_trait;

use crate::domain::commission::CommissionRecord;
use crate::domain::foundation::{AgentId, BookingId, CommissionId, DomainError};

/// Persistence for commission records.
///
/// Implementations must keep `booking_id` unique so a booking never carries
/// two commissions.
#[async_trait]
pub trait CommissionRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Conflict` if a record already exists for the booking
    async fn save(&self, record: &CommissionRecord) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `NotFound` if the record does not exist
    async fn update(&self, record: &CommissionRecord) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &CommissionId) -> Result<Option<CommissionRecord>, DomainError>;

    async fn find_by_booking(&self, booking_id: &BookingId)
        -> Result<Option<CommissionRecord>, DomainError>;

    async fn list_by_agent(&self, agent_id: &AgentId)
        -> Result<Vec<CommissionRecord>, DomainError>;

    async fn list_all(&self) -> Result<Vec<CommissionRecord>, DomainError>;
}
