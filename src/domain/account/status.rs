//! Lifecycle status shared by partner and referral-agent accounts.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Account lifecycle status.
///
/// Only `Active` grants a live session. Rejected and Suspended are terminal:
/// there is no reinstate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Registered, waiting for an administrator.
    Pending,
    Active,
    Rejected,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
            AccountStatus::Rejected => "rejected",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(AccountStatus::Pending),
            "active" | "approved" => Some(AccountStatus::Active),
            "rejected" => Some(AccountStatus::Rejected),
            "suspended" => Some(AccountStatus::Suspended),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        *self == AccountStatus::Active
    }
}

impl StateMachine for AccountStatus {
    const ENTITY: &'static str = "account";

    fn valid_transitions(&self) -> Vec<Self> {
        use AccountStatus::*;
        match self {
            Pending => vec![Active, Rejected],
            Active => vec![Suspended],
            Rejected | Suspended => vec![],
        }
    }
}

/// Administrative decision on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountDecision {
    Approve,
    Reject,
    Suspend,
}

impl AccountDecision {
    /// Status the decision moves the account to.
    pub fn target(&self) -> AccountStatus {
        match self {
            AccountDecision::Approve => AccountStatus::Active,
            AccountDecision::Reject => AccountStatus::Rejected,
            AccountDecision::Suspend => AccountStatus::Suspended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert_eq!(
            AccountStatus::Pending.transition_to(AccountStatus::Active),
            Ok(AccountStatus::Active)
        );
        assert_eq!(
            AccountStatus::Pending.transition_to(AccountStatus::Rejected),
            Ok(AccountStatus::Rejected)
        );
    }

    #[test]
    fn pending_cannot_be_suspended() {
        assert!(AccountStatus::Pending
            .transition_to(AccountStatus::Suspended)
            .is_err());
    }

    #[test]
    fn active_can_only_be_suspended() {
        assert_eq!(AccountStatus::Active.valid_transitions(), vec![AccountStatus::Suspended]);
    }

    #[test]
    fn rejected_and_suspended_are_terminal() {
        assert!(AccountStatus::Rejected.is_terminal());
        assert!(AccountStatus::Suspended.is_terminal());
        assert!(AccountStatus::Suspended
            .transition_to(AccountStatus::Active)
            .is_err());
    }

    #[test]
    fn parse_accepts_stored_spellings() {
        assert_eq!(AccountStatus::parse("Active"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::parse("approved"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::parse(" suspended "), Some(AccountStatus::Suspended));
        assert_eq!(AccountStatus::parse("banned"), None);
    }

    #[test]
    fn decisions_map_to_targets() {
        assert_eq!(AccountDecision::Approve.target(), AccountStatus::Active);
        assert_eq!(AccountDecision::Reject.target(), AccountStatus::Rejected);
        assert_eq!(AccountDecision::Suspend.target(), AccountStatus::Suspended);
    }
}
