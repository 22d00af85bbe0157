//! Partner account aggregate.
//!
//! A partner lists properties. Each principal owns at most one partner
//! account, and the account is unusable until an administrator approves it.

use serde::{Deserialize, Serialize};

use super::{AccountDecision, AccountStatus};
use crate::domain::foundation::{
    require_text, OwnedByUser, PartnerId, StateMachine, Timestamp, TransitionError, UserId,
    ValidationError,
};
use crate::domain::session::Administrator;

/// Owner-editable partner fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerProfile {
    pub business_name: String,
    pub location: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub show_contact_info: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
}

impl PartnerProfile {
    /// Trims text fields and rejects a blank business name or location.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            business_name: require_text("business_name", &self.business_name)?,
            location: require_text("location", &self.location)?,
            bio: trim_optional(self.bio),
            show_contact_info: self.show_contact_info,
            phone: trim_optional(self.phone),
            whatsapp: trim_optional(self.whatsapp),
        })
    }
}

pub(super) fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Partner account.
///
/// # Invariants
///
/// - `user_id` is unique across partner accounts
/// - `status` only changes through [`PartnerAccount::review`]
/// - `reviewed_by`/`reviewed_at` are set together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerAccount {
    pub id: PartnerId,
    pub user_id: UserId,
    pub profile: PartnerProfile,
    pub status: AccountStatus,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PartnerAccount {
    /// Registers a new partner, awaiting approval.
    pub fn register(
        user_id: UserId,
        profile: PartnerProfile,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: PartnerId::new(),
            user_id,
            profile: profile.validated()?,
            status: AccountStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Replaces the profile. Allowed in any status.
    pub fn update_profile(
        &mut self,
        profile: PartnerProfile,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        self.profile = profile.validated()?;
        self.updated_at = now;
        Ok(())
    }

    /// Applies an administrator's decision, recording the reviewer.
    pub fn review(
        &mut self,
        decision: AccountDecision,
        admin: &Administrator,
        now: Timestamp,
    ) -> Result<AccountStatus, TransitionError> {
        self.status = self.status.transition_to(decision.target())?;
        self.reviewed_by = Some(admin.user_id().clone());
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(self.status)
    }
}

impl OwnedByUser for PartnerAccount {
    fn owner_user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PartnerProfile {
        PartnerProfile {
            business_name: "  Seaside Villas ".to_string(),
            location: "Goa".to_string(),
            bio: Some("   ".to_string()),
            show_contact_info: true,
            phone: Some("+91 98765 43210".to_string()),
            whatsapp: None,
        }
    }

    fn admin() -> Administrator {
        Administrator::new(UserId::new("admin-1").unwrap())
    }

    fn partner() -> PartnerAccount {
        PartnerAccount::register(UserId::new("user-1").unwrap(), profile(), Timestamp::now())
            .unwrap()
    }

    #[test]
    fn register_starts_pending_with_trimmed_profile() {
        let partner = partner();
        assert_eq!(partner.status, AccountStatus::Pending);
        assert_eq!(partner.profile.business_name, "Seaside Villas");
        assert_eq!(partner.profile.bio, None);
        assert!(partner.reviewed_by.is_none());
    }

    #[test]
    fn register_rejects_blank_business_name() {
        let mut bad = profile();
        bad.business_name = " ".to_string();
        let err = PartnerAccount::register(UserId::new("u").unwrap(), bad, Timestamp::now())
            .unwrap_err();
        assert_eq!(err.field(), "business_name");
    }

    #[test]
    fn approve_records_reviewer() {
        let mut partner = partner();
        let status = partner
            .review(AccountDecision::Approve, &admin(), Timestamp::now())
            .unwrap();
        assert_eq!(status, AccountStatus::Active);
        assert!(partner.is_active());
        assert_eq!(partner.reviewed_by.as_ref().map(|u| u.as_str()), Some("admin-1"));
        assert!(partner.reviewed_at.is_some());
    }

    #[test]
    fn suspended_partner_cannot_be_reapproved() {
        let mut partner = partner();
        partner
            .review(AccountDecision::Approve, &admin(), Timestamp::now())
            .unwrap();
        partner
            .review(AccountDecision::Suspend, &admin(), Timestamp::now())
            .unwrap();
        assert!(partner
            .review(AccountDecision::Approve, &admin(), Timestamp::now())
            .is_err());
        assert_eq!(partner.status, AccountStatus::Suspended);
    }

    #[test]
    fn failed_review_leaves_account_untouched() {
        let mut partner = partner();
        let before = partner.clone();
        assert!(partner
            .review(AccountDecision::Suspend, &admin(), Timestamp::now())
            .is_err());
        assert_eq!(partner, before);
    }

    #[test]
    fn profile_can_be_edited_while_pending() {
        let mut partner = partner();
        let mut updated = profile();
        updated.location = "Kochi".to_string();
        partner.update_profile(updated, Timestamp::now()).unwrap();
        assert_eq!(partner.profile.location, "Kochi");
        assert_eq!(partner.status, AccountStatus::Pending);
    }
}
