//! PostgreSQL implementation of BookingRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error, int4, parse_enum, require_row, timestamp, uint};
use crate::domain::booking::{Booking, BookingStatus, GuestContact, StayDates};
use crate::domain::foundation::{BookingId, DomainError, Money, PartnerId, PropertyId, Timestamp};
use crate::ports::BookingRepository;

const COLUMNS: &str = "id, property_id, partner_id, guest_name, guest_email, guest_phone, \
     check_in, check_out, guests, total_price, status, responded_at, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    property_id: Uuid,
    partner_id: Uuid,
    guest_name: String,
    guest_email: String,
    guest_phone: Option<String>,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    guests: i32,
    total_price: i64,
    status: String,
    responded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let stay = StayDates::new(
            Timestamp::from_datetime(row.check_in),
            Timestamp::from_datetime(row.check_out),
        )
        .map_err(|e| corrupt("stay dates", e))?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            partner_id: PartnerId::from_uuid(row.partner_id),
            guest: GuestContact {
                name: row.guest_name,
                email: row.guest_email,
                phone: row.guest_phone,
            },
            stay,
            guests: uint("guests", row.guests)?,
            total_price: Money::new(row.total_price),
            status: parse_enum("status", &row.status, BookingStatus::parse)?,
            responded_at: timestamp(row.responded_at),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, property_id, partner_id, guest_name, guest_email, guest_phone,
                check_in, check_out, guests, total_price, status, responded_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.property_id.as_uuid())
        .bind(booking.partner_id.as_uuid())
        .bind(&booking.guest.name)
        .bind(&booking.guest.email)
        .bind(&booking.guest.phone)
        .bind(*booking.stay.check_in().as_datetime())
        .bind(*booking.stay.check_out().as_datetime())
        .bind(int4("guests", booking.guests)?)
        .bind(booking.total_price.amount())
        .bind(booking.status.as_str())
        .bind(booking.responded_at.as_ref().map(Timestamp::as_datetime))
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert booking"))?;
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2,
                responded_at = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.responded_at.as_ref().map(Timestamp::as_datetime))
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update booking"))?;
        require_row(result, "Booking", booking.id)
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {} FROM bookings WHERE id = $1", COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("fetch booking"))?;
        row.map(Booking::try_from).transpose()
    }

    async fn list_by_partner(&self, partner_id: &PartnerId) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE partner_id = $1 ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(partner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list partner bookings"))?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> =
            sqlx::query_as(&format!("SELECT {} FROM bookings ORDER BY created_at DESC", COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("list bookings"))?;
        rows.into_iter().map(Booking::try_from).collect()
    }
}
