//! PostgreSQL implementations of the support ticket and review repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    corrupt, db_error, optional_user_id, parse_enum, recipient_columns, recipient_from,
    require_row,
};
use crate::domain::foundation::{
    DomainError, PropertyId, ReviewId, SupportTicketId, Timestamp, UserId,
};
use crate::domain::notification::Recipient;
use crate::domain::support::{Review, ReviewStatus, SupportTicket, TicketStatus};
use crate::ports::{ReviewRepository, SupportTicketRepository};

// ════════════════════════════════════════════════════════════════════════════════
// Support tickets
// ════════════════════════════════════════════════════════════════════════════════

const TICKET_COLUMNS: &str = "id, requester_kind, requester_id, subject, message, status, \
     admin_response, handled_by, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresSupportTicketRepository {
    pool: PgPool,
}

impl PostgresSupportTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    requester_kind: String,
    requester_id: Uuid,
    subject: String,
    message: String,
    status: String,
    admin_response: Option<String>,
    handled_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for SupportTicket {
    type Error = DomainError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(SupportTicket {
            id: SupportTicketId::from_uuid(row.id),
            requester: recipient_from(&row.requester_kind, row.requester_id)?,
            subject: row.subject,
            message: row.message,
            status: parse_enum("status", &row.status, TicketStatus::parse)?,
            admin_response: row.admin_response,
            handled_by: optional_user_id("handled_by", row.handled_by)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl SupportTicketRepository for PostgresSupportTicketRepository {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        let (requester_kind, requester_id) = recipient_columns(&ticket.requester);
        sqlx::query(
            r#"
            INSERT INTO support_tickets (
                id, requester_kind, requester_id, subject, message, status,
                admin_response, handled_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(requester_kind)
        .bind(requester_id)
        .bind(&ticket.subject)
        .bind(&ticket.message)
        .bind(ticket.status.as_str())
        .bind(&ticket.admin_response)
        .bind(ticket.handled_by.as_ref().map(UserId::as_str))
        .bind(ticket.created_at.as_datetime())
        .bind(ticket.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert support ticket"))?;
        Ok(())
    }

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE support_tickets SET
                status = $2,
                admin_response = $3,
                handled_by = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(ticket.id.as_uuid())
        .bind(ticket.status.as_str())
        .bind(&ticket.admin_response)
        .bind(ticket.handled_by.as_ref().map(UserId::as_str))
        .bind(ticket.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update support ticket"))?;
        require_row(result, "Support ticket", ticket.id)
    }

    async fn find_by_id(&self, id: &SupportTicketId) -> Result<Option<SupportTicket>, DomainError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            "SELECT {} FROM support_tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch support ticket"))?;
        row.map(SupportTicket::try_from).transpose()
    }

    async fn list_for(&self, requester: &Recipient) -> Result<Vec<SupportTicket>, DomainError> {
        let (requester_kind, requester_id) = recipient_columns(requester);
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "SELECT {} FROM support_tickets WHERE requester_kind = $1 AND requester_id = $2 \
             ORDER BY created_at DESC",
            TICKET_COLUMNS
        ))
        .bind(requester_kind)
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list support tickets"))?;
        rows.into_iter().map(SupportTicket::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<SupportTicket>, DomainError> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "SELECT {} FROM support_tickets ORDER BY created_at DESC",
            TICKET_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list support tickets"))?;
        rows.into_iter().map(SupportTicket::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Reviews
// ════════════════════════════════════════════════════════════════════════════════

const REVIEW_COLUMNS: &str =
    "id, property_id, guest_name, rating, comment, status, moderated_by, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    property_id: Uuid,
    guest_name: String,
    rating: i16,
    comment: Option<String>,
    status: String,
    moderated_by: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = DomainError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: ReviewId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            guest_name: row.guest_name,
            rating: u8::try_from(row.rating).map_err(|_| corrupt("rating", row.rating))?,
            comment: row.comment,
            status: parse_enum("status", &row.status, ReviewStatus::parse)?,
            moderated_by: optional_user_id("moderated_by", row.moderated_by)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn save(&self, review: &Review) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO reviews (
                id, property_id, guest_name, rating, comment, status, moderated_by,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(review.id.as_uuid())
        .bind(review.property_id.as_uuid())
        .bind(&review.guest_name)
        .bind(i16::from(review.rating))
        .bind(&review.comment)
        .bind(review.status.as_str())
        .bind(review.moderated_by.as_ref().map(UserId::as_str))
        .bind(review.created_at.as_datetime())
        .bind(review.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert review"))?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE reviews SET
                status = $2,
                moderated_by = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(review.id.as_uuid())
        .bind(review.status.as_str())
        .bind(review.moderated_by.as_ref().map(UserId::as_str))
        .bind(review.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update review"))?;
        require_row(result, "Review", review.id)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        let row: Option<ReviewRow> =
            sqlx::query_as(&format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("fetch review"))?;
        row.map(Review::try_from).transpose()
    }

    async fn list_by_property(&self, property_id: &PropertyId) -> Result<Vec<Review>, DomainError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reviews WHERE property_id = $1 ORDER BY created_at DESC",
            REVIEW_COLUMNS
        ))
        .bind(property_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list property reviews"))?;
        rows.into_iter().map(Review::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Review>, DomainError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reviews ORDER BY created_at DESC",
            REVIEW_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list reviews"))?;
        rows.into_iter().map(Review::try_from).collect()
    }
}
