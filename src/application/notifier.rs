//! Best-effort notification delivery.
//!
//! Notifications are rows in the store. Workflows create them after their main
//! write has succeeded; a failure here is logged and reported but never undoes
//! the main write.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::notification::{Notification, NotificationKind, Recipient};
use crate::ports::NotificationRepository;

#[derive(Clone)]
pub struct Notifier {
    repository: Arc<dyn NotificationRepository>,
}

impl Notifier {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn notify(
        &self,
        recipient: Recipient,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<Notification, DomainError> {
        let notification = Notification::new(recipient, kind, title, message, Timestamp::now());
        self.repository.save(&notification).await?;
        Ok(notification)
    }

    /// Like [`Notifier::notify`] but swallows the error, returning its text.
    pub async fn notify_best_effort(
        &self,
        recipient: Recipient,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Option<String> {
        match self.notify(recipient, kind, title, message).await {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    recipient = ?recipient,
                    kind = kind.as_str(),
                    error = %e,
                    "Failed to enqueue notification"
                );
                Some(e.to_string())
            }
        }
    }
}
