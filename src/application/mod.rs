//! Application layer - workflow handlers and the concerns they share.
//!
//! Handlers orchestrate domain operations over the ports. Shared pieces:
//!
//! - [`WorkflowError`] - the one error type every handler returns
//! - [`InFlightRegistry`] - rejects a second submission for a busy entity
//! - [`Notifier`] - best-effort notification rows

pub mod error;
pub mod handlers;
mod in_flight;
mod notifier;

pub use error::WorkflowError;
pub use in_flight::{InFlightRegistry, InFlightToken};
pub use notifier::Notifier;
