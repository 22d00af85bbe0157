//! Role assignment lookup.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::session::Role;

/// Reads the roles assigned to a principal.
#[async_trait]
pub trait RoleReader: Send + Sync {
    /// All recognised roles held by `user_id`, in no particular order.
    ///
    /// Unrecognised role values are skipped, and a principal without any
    /// assignment yields an empty list.
    async fn roles_for(&self, user_id: &UserId) -> Result<Vec<Role>, DomainError>;

    /// Assigns `role` to `user_id`. Assigning a held role again is a no-op.
    async fn assign(&self, user_id: &UserId, role: Role) -> Result<(), DomainError>;
}
