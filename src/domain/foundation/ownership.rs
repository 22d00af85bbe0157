//! Ownership traits for single-writer resources.
//!
//! Two kinds of owner exist: a principal owns its partner or agent account,
//! and a partner account owns its listings and the feature requests filed for
//! them. Bookings are owned through their property.

use super::{DomainError, ErrorCode, PartnerId, UserId};

/// Resource owned directly by an authenticated principal.
pub trait OwnedByUser {
    fn owner_user_id(&self) -> &UserId;

    fn is_owned_by_user(&self, user_id: &UserId) -> bool {
        self.owner_user_id() == user_id
    }

    /// Returns `Forbidden` unless `user_id` owns the resource.
    fn check_user_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owned_by_user(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(ErrorCode::Forbidden, "User does not own this resource")
                .with_detail("owner_id", self.owner_user_id().to_string())
                .with_detail("requested_by", user_id.to_string()))
        }
    }
}

/// Resource owned by a partner account.
pub trait OwnedByPartner {
    fn owner_partner_id(&self) -> PartnerId;

    fn is_owned_by_partner(&self, partner_id: PartnerId) -> bool {
        self.owner_partner_id() == partner_id
    }
}
