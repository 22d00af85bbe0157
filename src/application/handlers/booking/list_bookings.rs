//! Booking lists for partners and administrators.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::BookingRepository;

pub struct ListBookingsHandler {
    guard: AccessGuard,
    bookings: Arc<dyn BookingRepository>,
}

impl ListBookingsHandler {
    pub fn new(guard: AccessGuard, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { guard, bookings }
    }

    /// Bookings on the calling partner's listings.
    pub async fn own(
        &self,
        actor: &AuthenticatedUser,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, WorkflowError> {
        let partner = self.guard.require_active_partner(actor).await?;
        let bookings = self.bookings.list_by_partner(&partner.id).await?;
        Ok(filter(bookings, status))
    }

    pub async fn all(
        &self,
        actor: &AuthenticatedUser,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, WorkflowError> {
        self.guard.require_admin(actor).await?;
        let bookings = self.bookings.list_all().await?;
        Ok(filter(bookings, status))
    }
}

fn filter(bookings: Vec<Booking>, status: Option<BookingStatus>) -> Vec<Booking> {
    match status {
        Some(status) => bookings.into_iter().filter(|b| b.status == status).collect(),
        None => bookings,
    }
}
