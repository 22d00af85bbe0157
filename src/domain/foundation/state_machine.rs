//! State machine trait for status enums.
//!
//! Every status-gated entity (accounts, bookings, feature requests,
//! commissions, tickets, reviews) declares its legal moves once here and
//! performs transitions through `transition_to`, so an illegal move can never
//! be written back to the store.

use std::fmt;
use thiserror::Error;

/// Rejected status transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move {entity} from {from} to {to}")]
pub struct TransitionError {
    pub entity: &'static str,
    pub from: String,
    pub to: String,
}

/// Trait for status enums that represent state machines.
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug {
    /// Entity name used in error messages (e.g. "booking").
    const ENTITY: &'static str;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(TransitionError {
                entity: Self::ENTITY,
                from: format!("{:?}", self).to_lowercase(),
                to: format!("{:?}", target).to_lowercase(),
            })
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
