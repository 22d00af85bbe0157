//! Application handlers.
//!
//! One handler per workflow. Each takes the acting principal, checks access
//! through [`session::AccessGuard`], claims an in-flight token for the entity
//! it mutates, and returns a `WorkflowError` on every failure path.

pub mod account;
pub mod booking;
pub mod commission;
pub mod feature_request;
pub mod notification;
pub mod property;
pub mod session;
pub mod support;

#[cfg(test)]
pub(crate) mod testing;
