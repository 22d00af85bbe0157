//! Roles a principal can hold in the marketplace.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Recognised role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ReferralAgent,
    Partner,
    Administrator,
}

/// Order in which held roles are evaluated; the first one held decides.
pub const ROLE_PRIORITY: [Role; 3] = [Role::ReferralAgent, Role::Partner, Role::Administrator];

impl Role {
    /// Parses a role value as stored in the role-assignment table.
    ///
    /// Unrecognised values yield `None` and are ignored by the resolver.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "agent" | "referrer" | "referral_agent" => Some(Role::ReferralAgent),
            "partner" => Some(Role::Partner),
            "admin" | "administrator" => Some(Role::Administrator),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ReferralAgent => "agent",
            Role::Partner => "partner",
            Role::Administrator => "admin",
        }
    }
}

/// Picks the role that governs the session from everything the principal holds.
pub fn primary_role(held: &[Role]) -> Option<Role> {
    ROLE_PRIORITY.into_iter().find(|role| held.contains(role))
}

/// Proof that the acting principal passed the administrator gate.
///
/// Admin-only transitions take this as a parameter and record `user_id` as
/// the reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Administrator {
    user_id: UserId,
}

impl Administrator {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_table_spellings() {
        assert_eq!(Role::parse("agent"), Some(Role::ReferralAgent));
        assert_eq!(Role::parse("Referrer"), Some(Role::ReferralAgent));
        assert_eq!(Role::parse("partner"), Some(Role::Partner));
        assert_eq!(Role::parse("admin"), Some(Role::Administrator));
        assert_eq!(Role::parse("guest"), None);
    }

    #[test]
    fn primary_role_follows_priority_order() {
        assert_eq!(
            primary_role(&[Role::Administrator, Role::ReferralAgent]),
            Some(Role::ReferralAgent)
        );
        assert_eq!(
            primary_role(&[Role::Administrator, Role::Partner]),
            Some(Role::Partner)
        );
        assert_eq!(primary_role(&[Role::Administrator]), Some(Role::Administrator));
    }

    #[test]
    fn primary_role_of_nothing_is_none() {
        assert_eq!(primary_role(&[]), None);
    }
}
