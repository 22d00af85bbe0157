//! Booking repository port.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, PartnerId};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `NotFound` if the booking does not exist
    async fn update(&self, booking: &Booking) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// Bookings on any property owned by `partner_id`, newest first.
    async fn list_by_partner(&self, partner_id: &PartnerId) -> Result<Vec<Booking>, DomainError>;

    async fn list_all(&self) -> Result<Vec<Booking>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BookingRepository) {}
    }
}
