//! Notification repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId};
use crate::domain::notification::{Notification, Recipient};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `NotFound` if the notification does not exist
    async fn update(&self, notification: &Notification) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError>;

    /// Notifications addressed to `recipient`, newest first.
    async fn list_for(&self, recipient: &Recipient) -> Result<Vec<Notification>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn NotificationRepository) {}
    }
}
