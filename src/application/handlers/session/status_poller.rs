//! PendingStatusPoller - watches a pending account until an admin decides.
//!
//! The "awaiting approval" surface needs to notice when its account leaves
//! Pending. Each watch is a spawned task that re-reads the account every
//! interval and publishes the result on a `watch` channel.
//!
//! ## Lifetime
//!
//! The task stops when:
//! - the account leaves Pending, or disappears
//! - [`StatusPollHandle::stop`] is called
//! - the handle is dropped (its shutdown sender closes)
//!
//! A failed read is published as [`AccountLookup::Failed`] and polling
//! continues.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use crate::domain::account::AccountStatus;
use crate::domain::foundation::UserId;
use crate::domain::session::{AccountLookup, Role};
use crate::ports::{AgentRepository, PartnerRepository};

#[derive(Clone)]
pub struct PendingStatusPoller {
    partners: Arc<dyn PartnerRepository>,
    agents: Arc<dyn AgentRepository>,
    interval: Duration,
}

impl PendingStatusPoller {
    pub fn new(
        partners: Arc<dyn PartnerRepository>,
        agents: Arc<dyn AgentRepository>,
        interval: Duration,
    ) -> Self {
        Self {
            partners,
            agents,
            interval,
        }
    }

    /// Starts watching the `role` account of `user_id`.
    ///
    /// Must be called inside a Tokio runtime. Administrators have no status;
    /// watching one publishes `Missing` and stops at once.
    pub fn watch(&self, role: Role, user_id: UserId) -> StatusPollHandle {
        let (status_tx, status_rx) = watch::channel(AccountLookup::Found(AccountStatus::Pending));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = self.clone();
        let task = tokio::spawn(async move {
            poller.run(role, user_id, status_tx, shutdown_rx).await;
        });
        StatusPollHandle {
            status: status_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(
        &self,
        role: Role,
        user_id: UserId,
        status_tx: watch::Sender<AccountLookup>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut interval = time::interval(self.interval);
        // The first tick completes immediately; the caller already knows the
        // account is pending.
        interval.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!(user_id = %user_id, "Status polling stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    let lookup = self.lookup(role, &user_id).await;
                    status_tx.send_replace(lookup);
                    if is_settled(lookup) {
                        tracing::info!(
                            user_id = %user_id,
                            status = ?lookup,
                            "Pending account settled"
                        );
                        return;
                    }
                }
            }
        }
    }

    async fn lookup(&self, role: Role, user_id: &UserId) -> AccountLookup {
        let found = match role {
            Role::Partner => self
                .partners
                .find_by_user_id(user_id)
                .await
                .map(|p| p.map(|p| p.status)),
            Role::ReferralAgent => self
                .agents
                .find_by_user_id(user_id)
                .await
                .map(|a| a.map(|a| a.status)),
            Role::Administrator => Ok(None),
        };
        match found {
            Ok(Some(status)) => AccountLookup::Found(status),
            Ok(None) => AccountLookup::Missing,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Status poll read failed");
                AccountLookup::Failed
            }
        }
    }
}

fn is_settled(lookup: AccountLookup) -> bool {
    match lookup {
        AccountLookup::Found(status) => status != AccountStatus::Pending,
        AccountLookup::Missing => true,
        AccountLookup::Failed => false,
    }
}

/// Owner of one running watch. Dropping it stops the task.
pub struct StatusPollHandle {
    status: watch::Receiver<AccountLookup>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl StatusPollHandle {
    /// Latest published lookup.
    pub fn current(&self) -> AccountLookup {
        *self.status.borrow()
    }

    /// A receiver that sees every later update.
    pub fn subscribe(&self) -> watch::Receiver<AccountLookup> {
        self.status.clone()
    }

    /// Waits for the next published lookup. `None` once polling has ended.
    pub async fn changed(&mut self) -> Option<AccountLookup> {
        self.status.changed().await.ok()?;
        Some(*self.status.borrow_and_update())
    }

    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task to exit.
    pub async fn join(self) {
        let StatusPollHandle { task, shutdown, .. } = self;
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Status poller task failed");
        }
        drop(shutdown);
    }
}
