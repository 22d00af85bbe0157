//! Pure session-resolution rules.
//!
//! Given the roles a principal holds and, for partners and agents, the status
//! of the matching account row, decide where the principal lands or why the
//! session is refused. Nothing here performs I/O; the application layer feeds
//! in lookups and carries out the sign-out that every denial requires.

use serde::Serialize;

use super::role::{primary_role, Role};
use crate::domain::account::AccountStatus;

/// Landing surface for a granted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Home,
    AgentDashboard,
    PartnerDashboard,
    AdminDashboard,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Home => "/",
            Destination::AgentDashboard => "/agent/dashboard",
            Destination::PartnerDashboard => "/partner/dashboard",
            Destination::AdminDashboard => "/admin/dashboard",
        }
    }
}

/// Why a session was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    PendingApproval,
    Rejected,
    Suspended,
    /// Role assigned but no matching account row.
    InvalidCredentials,
    /// A lookup against the store failed.
    UnableToVerify,
}

impl DenialReason {
    /// Message shown to the principal. Never mentions internal state.
    pub fn user_message(&self) -> &'static str {
        match self {
            DenialReason::PendingApproval => {
                "Your registration is pending approval. You can sign in once an administrator approves it."
            }
            DenialReason::Rejected => {
                "Your application was rejected. Please contact support for more information."
            }
            DenialReason::Suspended => {
                "Your account has been suspended. Please contact support."
            }
            DenialReason::InvalidCredentials => "Invalid login credentials.",
            DenialReason::UnableToVerify => "Unable to verify your account. Please try again.",
        }
    }

    /// Data-integrity and store failures are unexpected; status denials are not.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, DenialReason::InvalidCredentials | DenialReason::UnableToVerify)
    }
}

/// Final outcome of session resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionDecision {
    Granted {
        role: Option<Role>,
        destination: Destination,
    },
    Denied {
        reason: DenialReason,
    },
}

impl SessionDecision {
    pub fn granted(role: Option<Role>, destination: Destination) -> Self {
        SessionDecision::Granted { role, destination }
    }

    pub fn denied(reason: DenialReason) -> Self {
        SessionDecision::Denied { reason }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, SessionDecision::Granted { .. })
    }

    /// Every denial tears the live session down.
    pub fn requires_sign_out(&self) -> bool {
        !self.is_granted()
    }
}

/// First-stage decision made from role assignments alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDecision {
    /// Visitors and administrators need no account lookup.
    Settled(SessionDecision),
    /// Partner or agent; the account row decides.
    NeedsAccount(Role),
}

/// Result of fetching the status-bearing account for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountLookup {
    Found(AccountStatus),
    Missing,
    Failed,
}

/// Classifies the principal by the highest-priority role they hold.
pub fn decide_role(held: &[Role]) -> RoleDecision {
    match primary_role(held) {
        None => RoleDecision::Settled(SessionDecision::granted(None, Destination::Home)),
        Some(Role::Administrator) => RoleDecision::Settled(SessionDecision::granted(
            Some(Role::Administrator),
            Destination::AdminDashboard,
        )),
        Some(role) => RoleDecision::NeedsAccount(role),
    }
}

/// Decides a partner or agent session from the account lookup.
///
/// Only `Active` is sufficient; holding a row in any other status is not.
/// Administrators are granted regardless of the lookup.
pub fn decide_account(role: Role, lookup: AccountLookup) -> SessionDecision {
    let destination = match role {
        Role::ReferralAgent => Destination::AgentDashboard,
        Role::Partner => Destination::PartnerDashboard,
        Role::Administrator => {
            return SessionDecision::granted(Some(role), Destination::AdminDashboard)
        }
    };

    match lookup {
        AccountLookup::Failed => SessionDecision::denied(DenialReason::UnableToVerify),
        AccountLookup::Missing => SessionDecision::denied(DenialReason::InvalidCredentials),
        AccountLookup::Found(status) => match status {
            AccountStatus::Active => SessionDecision::granted(Some(role), destination),
            AccountStatus::Pending => SessionDecision::denied(DenialReason::PendingApproval),
            AccountStatus::Rejected => SessionDecision::denied(DenialReason::Rejected),
            AccountStatus::Suspended => SessionDecision::denied(DenialReason::Suspended),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NON_ACTIVE: [AccountStatus; 3] = [
        AccountStatus::Pending,
        AccountStatus::Rejected,
        AccountStatus::Suspended,
    ];

    #[test]
    fn no_roles_means_visitor_sent_home() {
        assert_eq!(
            decide_role(&[]),
            RoleDecision::Settled(SessionDecision::granted(None, Destination::Home))
        );
    }

    #[test]
    fn admin_is_settled_without_account() {
        assert_eq!(
            decide_role(&[Role::Administrator]),
            RoleDecision::Settled(SessionDecision::granted(
                Some(Role::Administrator),
                Destination::AdminDashboard
            ))
        );
    }

    #[test]
    fn agent_role_outranks_partner_role() {
        assert_eq!(
            decide_role(&[Role::Partner, Role::ReferralAgent]),
            RoleDecision::NeedsAccount(Role::ReferralAgent)
        );
    }

    #[test]
    fn active_accounts_reach_their_dashboards() {
        assert_eq!(
            decide_account(Role::Partner, AccountLookup::Found(AccountStatus::Active)),
            SessionDecision::granted(Some(Role::Partner), Destination::PartnerDashboard)
        );
        assert_eq!(
            decide_account(Role::ReferralAgent, AccountLookup::Found(AccountStatus::Active)),
            SessionDecision::granted(Some(Role::ReferralAgent), Destination::AgentDashboard)
        );
    }

    #[test]
    fn every_non_active_status_is_denied_and_signed_out() {
        for role in [Role::Partner, Role::ReferralAgent] {
            for status in NON_ACTIVE {
                let decision = decide_account(role, AccountLookup::Found(status));
                assert!(!decision.is_granted(), "{:?}/{:?} must be denied", role, status);
                assert!(decision.requires_sign_out());
            }
        }
    }

    #[test]
    fn status_maps_to_specific_reason() {
        let reason = |status| match decide_account(Role::Partner, AccountLookup::Found(status)) {
            SessionDecision::Denied { reason } => reason,
            other => panic!("expected denial, got {:?}", other),
        };
        assert_eq!(reason(AccountStatus::Pending), DenialReason::PendingApproval);
        assert_eq!(reason(AccountStatus::Rejected), DenialReason::Rejected);
        assert_eq!(reason(AccountStatus::Suspended), DenialReason::Suspended);
    }

    #[test]
    fn missing_account_is_invalid_credentials() {
        assert_eq!(
            decide_account(Role::ReferralAgent, AccountLookup::Missing),
            SessionDecision::denied(DenialReason::InvalidCredentials)
        );
    }

    #[test]
    fn failed_lookup_is_unable_to_verify() {
        assert_eq!(
            decide_account(Role::Partner, AccountLookup::Failed),
            SessionDecision::denied(DenialReason::UnableToVerify)
        );
    }

    #[test]
    fn administrator_ignores_account_lookup() {
        for lookup in [
            AccountLookup::Missing,
            AccountLookup::Failed,
            AccountLookup::Found(AccountStatus::Suspended),
        ] {
            assert!(decide_account(Role::Administrator, lookup).is_granted());
        }
    }

    #[test]
    fn unexpected_reasons_are_flagged() {
        assert!(DenialReason::InvalidCredentials.is_unexpected());
        assert!(DenialReason::UnableToVerify.is_unexpected());
        assert!(!DenialReason::PendingApproval.is_unexpected());
    }

    #[test]
    fn destinations_have_paths() {
        assert_eq!(Destination::Home.path(), "/");
        assert_eq!(Destination::PartnerDashboard.path(), "/partner/dashboard");
    }
}
