//! Partner and referral-agent account handlers.

mod list_accounts;
mod register_agent;
mod register_partner;
mod review_agent;
mod review_partner;
mod update_profile;

pub use list_accounts::{ListAccountsQuery, ListAgentsHandler, ListPartnersHandler};
pub use register_agent::{RegisterAgentCommand, RegisterAgentHandler};
pub use register_partner::{RegisterPartnerCommand, RegisterPartnerHandler, RegisterPartnerResult};
pub use review_agent::{ReviewAgentCommand, ReviewAgentHandler, ReviewAgentResult};
pub use review_partner::{ReviewPartnerCommand, ReviewPartnerHandler, ReviewPartnerResult};
pub use update_profile::{UpdatePartnerProfileHandler, UpdatePayoutDetailsHandler};

use crate::domain::account::AccountStatus;

/// Notification text for a reviewed account.
fn review_message(status: AccountStatus) -> (&'static str, &'static str) {
    match status {
        AccountStatus::Active => (
            "Account approved",
            "Your account has been approved. You can now sign in.",
        ),
        AccountStatus::Rejected => (
            "Account rejected",
            "Your registration was not approved. Please contact support.",
        ),
        AccountStatus::Suspended => (
            "Account suspended",
            "Your account has been suspended. Please contact support.",
        ),
        AccountStatus::Pending => (
            "Account under review",
            "Your registration is awaiting approval.",
        ),
    }
}
