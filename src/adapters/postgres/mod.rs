//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! One repository per port, all sharing a `PgPool`. Queries are built at
//! runtime with bound parameters. Enum columns hold the lowercase strings the
//! domain types parse; unknown values surface as `DatabaseError`.

mod account_repositories;
mod booking_repository;
mod commission_repository;
mod feature_request_repository;
mod notification_repository;
mod property_repository;
mod role_repository;
mod support_repository;

pub use account_repositories::{
    PostgresAgentRepository, PostgresPartnerRepository, PostgresReferralLinkRepository,
};
pub use booking_repository::PostgresBookingRepository;
pub use commission_repository::PostgresCommissionRepository;
pub use feature_request_repository::PostgresFeatureRequestRepository;
pub use notification_repository::PostgresNotificationRepository;
pub use property_repository::PostgresPropertyRepository;
pub use role_repository::PostgresRoleRepository;
pub use support_repository::{PostgresReviewRepository, PostgresSupportTicketRepository};

use std::fmt::Display;

use sqlx::postgres::PgQueryResult;
use uuid::Uuid;

use crate::domain::foundation::{
    AgentId, DomainError, ErrorCode, PartnerId, Percentage, Timestamp, UserId,
};
use crate::domain::notification::Recipient;

/// Maps a driver error, naming the failed action.
fn db_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

/// Like [`db_error`] but reports a unique-constraint hit as a conflict.
fn insert_error(action: &'static str, conflict: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return DomainError::new(ErrorCode::Conflict, conflict);
            }
        }
        DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
    }
}

/// An UPDATE that touched nothing means the row is gone.
fn require_row(result: PgQueryResult, entity: &str, id: impl Display) -> Result<(), DomainError> {
    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::NotFound,
            format!("{} {} not found", entity, id),
        ));
    }
    Ok(())
}

fn corrupt(column: &str, value: impl Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, value),
    )
}

fn parse_enum<T>(column: &str, raw: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T, DomainError> {
    parse(raw).ok_or_else(|| corrupt(column, raw))
}

fn user_id(column: &str, raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw.clone()).map_err(|_| corrupt(column, raw))
}

fn optional_user_id(column: &str, raw: Option<String>) -> Result<Option<UserId>, DomainError> {
    raw.map(|r| user_id(column, r)).transpose()
}

fn int4(column: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| corrupt(column, value))
}

fn uint(column: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt(column, value))
}

fn percentage(column: &str, value: i16) -> Result<Percentage, DomainError> {
    u8::try_from(value)
        .ok()
        .and_then(|v| Percentage::try_new(v).ok())
        .ok_or_else(|| corrupt(column, value))
}

fn timestamp(value: Option<chrono::DateTime<chrono::Utc>>) -> Option<Timestamp> {
    value.map(Timestamp::from_datetime)
}

fn recipient_columns(recipient: &Recipient) -> (&'static str, Uuid) {
    match recipient {
        Recipient::Partner(id) => ("partner", *id.as_uuid()),
        Recipient::Agent(id) => ("agent", *id.as_uuid()),
    }
}

fn recipient_from(kind: &str, id: Uuid) -> Result<Recipient, DomainError> {
    match kind {
        "partner" => Ok(Recipient::Partner(PartnerId::from_uuid(id))),
        "agent" => Ok(Recipient::Agent(AgentId::from_uuid(id))),
        other => Err(corrupt("recipient_kind", other)),
    }
}
