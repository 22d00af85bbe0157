//! CreateBookingHandler - an anonymous guest requests a stay.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::application::error::WorkflowError;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::booking::{Booking, GuestContact, StayDates};
use crate::domain::foundation::{PropertyId, Timestamp};
use crate::domain::notification::{NotificationKind, Recipient};
use crate::ports::{BookingRepository, PropertyRepository};

#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub property_id: PropertyId,
    pub guest: GuestContact,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

#[derive(Debug, Clone)]
pub struct CreateBookingResult {
    pub booking: Booking,
    pub notification_error: Option<String>,
}

pub struct CreateBookingHandler {
    properties: Arc<dyn PropertyRepository>,
    bookings: Arc<dyn BookingRepository>,
    notifier: Notifier,
    in_flight: InFlightRegistry,
}

impl CreateBookingHandler {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        bookings: Arc<dyn BookingRepository>,
        notifier: Notifier,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            properties,
            bookings,
            notifier,
            in_flight,
        }
    }

    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<CreateBookingResult, WorkflowError> {
        let guest_key = format!("{}:{}", cmd.property_id, cmd.guest.email.trim().to_lowercase());
        let _token = self.in_flight.acquire("booking.create", guest_key)?;

        // 1. Only listings visible to the public take bookings
        let property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| WorkflowError::not_found("Property", cmd.property_id))?;

        // 2. Price and persist
        let stay = StayDates::from_dates(cmd.check_in, cmd.check_out)?;
        let booking = Booking::request(&property, cmd.guest, stay, cmd.guests, Timestamp::now())?;
        self.bookings.save(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            property_id = %property.id,
            nights = booking.nights(),
            total = %booking.total_price,
            "Booking requested"
        );

        // 3. Tell the owner
        let message = format!(
            "{} requested {} night(s) at \"{}\" for {} guest(s).",
            booking.guest.name,
            booking.nights(),
            property.details.name,
            booking.guests
        );
        let notification_error = self
            .notifier
            .notify_best_effort(
                Recipient::Partner(property.partner_id),
                NotificationKind::BookingReceived,
                "New booking request",
                &message,
            )
            .await;

        Ok(CreateBookingResult {
            booking,
            notification_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Harness;
    use crate::domain::account::AccountStatus;
    use crate::domain::booking::BookingStatus;
    use crate::domain::foundation::{Money, UserId};
    use crate::domain::session::Administrator;

    fn handler(h: &Harness) -> CreateBookingHandler {
        CreateBookingHandler::new(
            h.store.clone(),
            h.store.clone(),
            h.notifier.clone(),
            h.in_flight.clone(),
        )
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
    }

    fn cmd(property_id: PropertyId, guests: u32) -> CreateBookingCommand {
        CreateBookingCommand {
            property_id,
            guest: GuestContact {
                name: "Ana Souza".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
            },
            check_in: date(10),
            check_out: date(13),
            guests,
        }
    }

    #[tokio::test]
    async fn prices_stay_and_notifies_owner() {
        let h = Harness::new();
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;

        let result = handler(&h).handle(cmd(property.id, 2)).await.unwrap();

        assert_eq!(result.booking.status, BookingStatus::Pending);
        assert_eq!(result.booking.total_price, Money::new(15_000));
        assert_eq!(result.booking.partner_id, partner.id);
        assert!(result.notification_error.is_none());
        assert_eq!(h.store.notification_count(&Recipient::Partner(partner.id)), 1);
    }

    #[tokio::test]
    async fn inactive_property_is_not_bookable() {
        let h = Harness::new();
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let mut property = h.property(&partner).await;
        property.set_active(
            false,
            &Administrator::new(UserId::new("boss").unwrap()),
            Timestamp::now(),
        );
        PropertyRepository::update(h.store.as_ref(), &property)
            .await
            .unwrap();

        let err = handler(&h).handle(cmd(property.id, 2)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { .. }));
    }

    #[tokio::test]
    async fn too_many_guests_is_rejected() {
        let h = Harness::new();
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        let err = handler(&h).handle(cmd(property.id, 9)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { .. }));
    }

    #[tokio::test]
    async fn reversed_dates_are_rejected() {
        let h = Harness::new();
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        let mut reversed = cmd(property.id, 2);
        reversed.check_in = date(13);
        reversed.check_out = date(10);
        let err = handler(&h).handle(reversed).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { .. }));
    }

    #[tokio::test]
    async fn notification_failure_keeps_booking() {
        let h = Harness::new();
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        h.store.fail_on("notification.save");

        let result = handler(&h).handle(cmd(property.id, 2)).await.unwrap();
        assert!(result.notification_error.is_some());
        let stored = BookingRepository::list_all(h.store.as_ref()).await.unwrap();
        assert_eq!(stored.len(), 1);
    }
}
