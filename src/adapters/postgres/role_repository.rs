//! PostgreSQL implementation of RoleReader.

use async_trait::async_trait;
use sqlx::PgPool;

use super::db_error;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::session::Role;
use crate::ports::RoleReader;

#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleReader for PostgresRoleRepository {
    async fn roles_for(&self, user_id: &UserId) -> Result<Vec<Role>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("load roles"))?;

        let mut roles = Vec::with_capacity(rows.len());
        for (raw,) in rows {
            match Role::parse(&raw) {
                Some(role) if !roles.contains(&role) => roles.push(role),
                Some(_) => {}
                None => tracing::debug!(user_id = %user_id, role = %raw, "Ignoring unknown role"),
            }
        }
        Ok(roles)
    }

    async fn assign(&self, user_id: &UserId, role: Role) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role) DO NOTHING
            "#,
        )
        .bind(user_id.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("assign role"))?;
        Ok(())
    }
}
