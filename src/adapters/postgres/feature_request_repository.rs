//! PostgreSQL implementation of FeatureRequestRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    db_error, insert_error, int4, optional_user_id, parse_enum, require_row, timestamp, uint,
};
use crate::domain::feature_request::{FeatureRequest, FeatureRequestStatus};
use crate::domain::foundation::{
    DomainError, FeatureRequestId, PartnerId, PropertyId, Timestamp, UserId,
};
use crate::ports::FeatureRequestRepository;

const COLUMNS: &str = "id, property_id, partner_id, duration_days, payment_method, remarks, \
     status, reviewed_by, reviewed_at, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresFeatureRequestRepository {
    pool: PgPool,
}

impl PostgresFeatureRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FeatureRequestRow {
    id: Uuid,
    property_id: Uuid,
    partner_id: Uuid,
    duration_days: i32,
    payment_method: String,
    remarks: Option<String>,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FeatureRequestRow> for FeatureRequest {
    type Error = DomainError;

    fn try_from(row: FeatureRequestRow) -> Result<Self, Self::Error> {
        Ok(FeatureRequest {
            id: FeatureRequestId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            partner_id: PartnerId::from_uuid(row.partner_id),
            duration_days: uint("duration_days", row.duration_days)?,
            payment_method: row.payment_method,
            remarks: row.remarks,
            status: parse_enum("status", &row.status, FeatureRequestStatus::parse)?,
            reviewed_by: optional_user_id("reviewed_by", row.reviewed_by)?,
            reviewed_at: timestamp(row.reviewed_at),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl FeatureRequestRepository for PostgresFeatureRequestRepository {
    async fn save(&self, request: &FeatureRequest) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO feature_requests (
                id, property_id, partner_id, duration_days, payment_method, remarks,
                status, reviewed_by, reviewed_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.property_id.as_uuid())
        .bind(request.partner_id.as_uuid())
        .bind(int4("duration_days", request.duration_days)?)
        .bind(&request.payment_method)
        .bind(&request.remarks)
        .bind(request.status.as_str())
        .bind(request.reviewed_by.as_ref().map(UserId::as_str))
        .bind(request.reviewed_at.as_ref().map(Timestamp::as_datetime))
        .bind(request.created_at.as_datetime())
        .bind(request.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(insert_error(
            "insert feature request",
            "A feature request for this property is already pending",
        ))?;
        Ok(())
    }

    async fn update(&self, request: &FeatureRequest) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE feature_requests SET
                status = $2,
                reviewed_by = $3,
                reviewed_at = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.status.as_str())
        .bind(request.reviewed_by.as_ref().map(UserId::as_str))
        .bind(request.reviewed_at.as_ref().map(Timestamp::as_datetime))
        .bind(request.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update feature request"))?;
        require_row(result, "Feature request", request.id)
    }

    async fn find_by_id(
        &self,
        id: &FeatureRequestId,
    ) -> Result<Option<FeatureRequest>, DomainError> {
        let row: Option<FeatureRequestRow> =
            sqlx::query_as(&format!("SELECT {} FROM feature_requests WHERE id = $1", COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("fetch feature request"))?;
        row.map(FeatureRequest::try_from).transpose()
    }

    async fn list_by_partner(
        &self,
        partner_id: &PartnerId,
    ) -> Result<Vec<FeatureRequest>, DomainError> {
        let rows: Vec<FeatureRequestRow> = sqlx::query_as(&format!(
            "SELECT {} FROM feature_requests WHERE partner_id = $1 ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(partner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list partner feature requests"))?;
        rows.into_iter().map(FeatureRequest::try_from).collect()
    }

    async fn list(
        &self,
        status: Option<FeatureRequestStatus>,
    ) -> Result<Vec<FeatureRequest>, DomainError> {
        let rows: Vec<FeatureRequestRow> = sqlx::query_as(&format!(
            "SELECT {} FROM feature_requests WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC",
            COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list feature requests"))?;
        rows.into_iter().map(FeatureRequest::try_from).collect()
    }
}
