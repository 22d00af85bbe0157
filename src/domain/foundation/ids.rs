//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier with the usual constructors and traits.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a partner (property owner) account.
    PartnerId
);
uuid_id!(
    /// Unique identifier for a referral-agent account.
    AgentId
);
uuid_id!(
    /// Unique identifier for a property listing.
    PropertyId
);
uuid_id!(
    /// Unique identifier for a paid feature request.
    FeatureRequestId
);
uuid_id!(
    /// Unique identifier for a booking request.
    BookingId
);
uuid_id!(
    /// Unique identifier for a partner-to-agent referral link.
    ReferralLinkId
);
uuid_id!(
    /// Unique identifier for a commission record.
    CommissionId
);
uuid_id!(
    /// Unique identifier for a notification.
    NotificationId
);
uuid_id!(
    /// Unique identifier for a support ticket.
    SupportTicketId
);
uuid_id!(
    /// Unique identifier for a guest review.
    ReviewId
);

/// Identifier of an authenticated principal.
///
/// This is the opaque subject issued by the auth service, so it is kept as a
/// string rather than forced into a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
