//! PostgreSQL implementation of NotificationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{db_error, parse_enum, recipient_columns, recipient_from, require_row};
use crate::domain::foundation::{DomainError, NotificationId, Timestamp};
use crate::domain::notification::{Notification, NotificationKind, NotificationStatus, Recipient};
use crate::ports::NotificationRepository;

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_kind: String,
    recipient_id: Uuid,
    kind: String,
    title: String,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: NotificationId::from_uuid(row.id),
            recipient: recipient_from(&row.recipient_kind, row.recipient_id)?,
            kind: NotificationKind::parse(&row.kind),
            title: row.title,
            message: row.message,
            status: parse_enum("status", &row.status, NotificationStatus::parse)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        let (recipient_kind, recipient_id) = recipient_columns(&notification.recipient);
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, recipient_kind, recipient_id, kind, title, message, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(recipient_kind)
        .bind(recipient_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.status.as_str())
        .bind(notification.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("insert notification"))?;
        Ok(())
    }

    async fn update(&self, notification: &Notification) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE notifications SET status = $2 WHERE id = $1")
            .bind(notification.id.as_uuid())
            .bind(notification.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("update notification"))?;
        require_row(result, "Notification", notification.id)
    }

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError> {
        let row: Option<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, recipient_kind, recipient_id, kind, title, message, status, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch notification"))?;
        row.map(Notification::try_from).transpose()
    }

    async fn list_for(&self, recipient: &Recipient) -> Result<Vec<Notification>, DomainError> {
        let (recipient_kind, recipient_id) = recipient_columns(recipient);
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, recipient_kind, recipient_id, kind, title, message, status, created_at
            FROM notifications
            WHERE recipient_kind = $1 AND recipient_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(recipient_kind)
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list notifications"))?;
        rows.into_iter().map(Notification::try_from).collect()
    }
}
