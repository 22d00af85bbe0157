//! Booking aggregate.

use serde::{Deserialize, Serialize};

use super::{BookingStatus, StayDates};
use crate::domain::foundation::{
    require_text, Authorizable, BookingId, Money, OwnedByPartner, PartnerId, PropertyId,
    StateMachine, Timestamp, TransitionError, ValidationError,
};
use crate::domain::property::Property;

/// Contact details left by an anonymous guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl GuestContact {
    pub fn validated(self) -> Result<Self, ValidationError> {
        let email = require_text("guest_email", &self.email)?;
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("guest_email", "missing @"));
        }
        Ok(Self {
            name: require_text("guest_name", &self.name)?,
            email,
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        })
    }
}

/// Owning partner's answer to a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingResponse {
    Confirm,
    Decline,
}

impl BookingResponse {
    pub fn target(&self) -> BookingStatus {
        match self {
            BookingResponse::Confirm => BookingStatus::Confirmed,
            BookingResponse::Decline => BookingStatus::Declined,
        }
    }
}

/// A guest's request to stay at a property.
///
/// # Invariants
///
/// - `total_price` is fixed at creation as nightly rate times nights
/// - `partner_id` is the property owner at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub property_id: PropertyId,
    pub partner_id: PartnerId,
    pub guest: GuestContact,
    pub stay: StayDates,
    pub guests: u32,
    pub total_price: Money,
    pub status: BookingStatus,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Prices a new pending booking against `property`.
    pub fn request(
        property: &Property,
        guest: GuestContact,
        stay: StayDates,
        guests: u32,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        property.check_guests(guests)?;
        Ok(Self {
            id: BookingId::new(),
            property_id: property.id,
            partner_id: property.partner_id,
            guest: guest.validated()?,
            stay,
            guests,
            total_price: property.details.price_per_night.times(stay.nights()),
            status: BookingStatus::Pending,
            responded_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn nights(&self) -> i64 {
        self.stay.nights()
    }

    /// Moves the booking out of Pending. Terminal bookings refuse.
    pub fn respond(
        &mut self,
        response: BookingResponse,
        now: Timestamp,
    ) -> Result<BookingStatus, TransitionError> {
        self.status = self.status.transition_to(response.target())?;
        self.responded_at = Some(now);
        self.updated_at = now;
        Ok(self.status)
    }
}

impl OwnedByPartner for Booking {
    fn owner_partner_id(&self) -> PartnerId {
        self.partner_id
    }
}

impl Authorizable for Booking {
    const RESOURCE_TYPE: &'static str = "Booking";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
