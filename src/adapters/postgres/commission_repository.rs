//! PostgreSQL implementation of CommissionRepository.
//!
//! `booking_id` is unique, so a second derivation for the same booking is
//! reported as a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{db_error, insert_error, optional_user_id, parse_enum, percentage, require_row};
use crate::domain::commission::{CommissionRecord, CommissionStatus};
use crate::domain::foundation::{
    AgentId, BookingId, CommissionId, DomainError, Money, PartnerId, Timestamp, UserId,
};
use crate::ports::CommissionRepository;

const COLUMNS: &str = "id, agent_id, partner_id, booking_id, booking_amount, rate, amount, \
     status, updated_by, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresCommissionRepository {
    pool: PgPool,
}

impl PostgresCommissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CommissionRow {
    id: Uuid,
    agent_id: Uuid,
    partner_id: Uuid,
    booking_id: Uuid,
    booking_amount: i64,
    rate: i16,
    amount: i64,
    status: String,
    updated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CommissionRow> for CommissionRecord {
    type Error = DomainError;

    fn try_from(row: CommissionRow) -> Result<Self, Self::Error> {
        Ok(CommissionRecord {
            id: CommissionId::from_uuid(row.id),
            agent_id: AgentId::from_uuid(row.agent_id),
            partner_id: PartnerId::from_uuid(row.partner_id),
            booking_id: BookingId::from_uuid(row.booking_id),
            booking_amount: Money::new(row.booking_amount),
            rate: percentage("rate", row.rate)?,
            amount: Money::new(row.amount),
            status: parse_enum("status", &row.status, CommissionStatus::parse)?,
            updated_by: optional_user_id("updated_by", row.updated_by)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl CommissionRepository for PostgresCommissionRepository {
    async fn save(&self, record: &CommissionRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO commissions (
                id, agent_id, partner_id, booking_id, booking_amount, rate, amount,
                status, updated_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.agent_id.as_uuid())
        .bind(record.partner_id.as_uuid())
        .bind(record.booking_id.as_uuid())
        .bind(record.booking_amount.amount())
        .bind(i16::from(record.rate.value()))
        .bind(record.amount.amount())
        .bind(record.status.as_str())
        .bind(record.updated_by.as_ref().map(UserId::as_str))
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(insert_error(
            "insert commission",
            "A commission already exists for this booking",
        ))?;
        Ok(())
    }

    async fn update(&self, record: &CommissionRecord) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE commissions SET
                status = $2,
                updated_by = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.status.as_str())
        .bind(record.updated_by.as_ref().map(UserId::as_str))
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update commission"))?;
        require_row(result, "Commission", record.id)
    }

    async fn find_by_id(&self, id: &CommissionId) -> Result<Option<CommissionRecord>, DomainError> {
        let row: Option<CommissionRow> =
            sqlx::query_as(&format!("SELECT {} FROM commissions WHERE id = $1", COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("fetch commission"))?;
        row.map(CommissionRecord::try_from).transpose()
    }

    async fn find_by_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<CommissionRecord>, DomainError> {
        let row: Option<CommissionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commissions WHERE booking_id = $1",
            COLUMNS
        ))
        .bind(booking_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch commission by booking"))?;
        row.map(CommissionRecord::try_from).transpose()
    }

    async fn list_by_agent(&self, agent_id: &AgentId) -> Result<Vec<CommissionRecord>, DomainError> {
        let rows: Vec<CommissionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commissions WHERE agent_id = $1 ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(agent_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list agent commissions"))?;
        rows.into_iter().map(CommissionRecord::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<CommissionRecord>, DomainError> {
        let rows: Vec<CommissionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commissions ORDER BY created_at DESC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list commissions"))?;
        rows.into_iter().map(CommissionRecord::try_from).collect()
    }
}
