//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait, ownership
//! and authorization helpers, and error types that form the vocabulary of
//! the marketplace domain.

mod auth;
mod authorization;
mod errors;
mod ids;
mod money;
mod ownership;
mod percentage;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use authorization::{check_partner_ownership, Authorizable, AuthorizationResult};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    AgentId, BookingId, CommissionId, FeatureRequestId, NotificationId, PartnerId, PropertyId,
    ReferralLinkId, ReviewId, SupportTicketId, UserId,
};
pub use money::Money;
pub use ownership::{OwnedByPartner, OwnedByUser};
pub use percentage::Percentage;
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;

/// Rejects blank text fields, returning the trimmed value.
pub fn require_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}
