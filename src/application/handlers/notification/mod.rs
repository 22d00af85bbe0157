//! Notification inbox handlers.
//!
//! Partners and agents each have one inbox. The acting role picks which
//! account's inbox is read, so a principal never sees another account's
//! messages.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::domain::foundation::{AuthenticatedUser, NotificationId};
use crate::domain::notification::Notification;
use crate::domain::session::Role;
use crate::ports::NotificationRepository;

pub struct ListNotificationsHandler {
    guard: AccessGuard,
    notifications: Arc<dyn NotificationRepository>,
}

impl ListNotificationsHandler {
    pub fn new(guard: AccessGuard, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self {
            guard,
            notifications,
        }
    }

    /// Newest first.
    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        role: Role,
        unread_only: bool,
    ) -> Result<Vec<Notification>, WorkflowError> {
        let recipient = self.guard.require_recipient(actor, role).await?;
        let mut notifications = self.notifications.list_for(&recipient).await?;
        if unread_only {
            notifications.retain(Notification::is_unread);
        }
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }
}

pub struct MarkNotificationReadHandler {
    guard: AccessGuard,
    notifications: Arc<dyn NotificationRepository>,
}

impl MarkNotificationReadHandler {
    pub fn new(guard: AccessGuard, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self {
            guard,
            notifications,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        role: Role,
        id: NotificationId,
    ) -> Result<Notification, WorkflowError> {
        let recipient = self.guard.require_recipient(actor, role).await?;
        let mut notification = self
            .notifications
            .find_by_id(&id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Notification", id))?;

        let was_unread = notification.is_unread();
        notification.mark_read(recipient)?;
        if was_unread {
            self.notifications.update(&notification).await?;
        }
        Ok(notification)
    }
}
