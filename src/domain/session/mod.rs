//! Session/role resolution.
//!
//! - `role` - Role assignments, priority order, administrator capability
//! - `decision` - Pure decision functions producing a `SessionDecision`

mod decision;
mod role;

pub use decision::{
    decide_account, decide_role, AccountLookup, DenialReason, Destination, RoleDecision,
    SessionDecision,
};
pub use role::{primary_role, Administrator, Role, ROLE_PRIORITY};
