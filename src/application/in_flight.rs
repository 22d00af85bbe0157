//! Double-submit guard.
//!
//! Every mutating workflow takes a token keyed by the entity it touches. A
//! second submission for the same entity while the first is still running is
//! rejected with `AlreadyInFlight` instead of racing it. Tokens release on
//! drop, including when the handler returns early with an error.

use std::fmt::Display;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::WorkflowError;
use crate::domain::foundation::Timestamp;

/// Process-wide registry of entities with a mutation in progress.
#[derive(Clone, Default)]
pub struct InFlightRegistry {
    held: Arc<DashMap<String, Timestamp>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `kind:id`, failing if it is already claimed.
    pub fn acquire(&self, kind: &str, id: impl Display) -> Result<InFlightToken, WorkflowError> {
        let key = format!("{}:{}", kind, id);
        match self.held.entry(key.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(key = %key, "Rejected duplicate submission");
                Err(WorkflowError::AlreadyInFlight(key))
            }
            Entry::Vacant(slot) => {
                slot.insert(Timestamp::now());
                Ok(InFlightToken {
                    held: Arc::clone(&self.held),
                    key,
                })
            }
        }
    }

    pub fn is_in_flight(&self, kind: &str, id: impl Display) -> bool {
        self.held.contains_key(&format!("{}:{}", kind, id))
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

/// Claim on one entity. Released on drop.
#[must_use = "the claim is released as soon as the token is dropped"]
pub struct InFlightToken {
    held: Arc<DashMap<String, Timestamp>>,
    key: String,
}

impl InFlightToken {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.held.remove(&self.key);
    }
}

impl std::fmt::Debug for InFlightToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightToken").field("key", &self.key).finish()
    }
}
