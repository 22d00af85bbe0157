//! Feature request module - partner requests to promote a listing.
//!
//! Approval is the only transition with a derived write: it features the
//! linked property for the requested number of days.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    require_text, Authorizable, FeatureRequestId, OwnedByPartner, PartnerId, PropertyId,
    StateMachine, Timestamp, TransitionError, UserId, ValidationError,
};
use crate::domain::property::MAX_FEATURE_DAYS;
use crate::domain::session::Administrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl FeatureRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureRequestStatus::Pending => "pending",
            FeatureRequestStatus::Approved => "approved",
            FeatureRequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(FeatureRequestStatus::Pending),
            "approved" => Some(FeatureRequestStatus::Approved),
            "rejected" => Some(FeatureRequestStatus::Rejected),
            _ => None,
        }
    }
}

impl StateMachine for FeatureRequestStatus {
    const ENTITY: &'static str = "feature request";

    fn valid_transitions(&self) -> Vec<Self> {
        use FeatureRequestStatus::*;
        match self {
            Pending => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

/// A partner's request to feature one of their properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRequest {
    pub id: FeatureRequestId,
    pub property_id: PropertyId,
    pub partner_id: PartnerId,
    pub duration_days: u32,
    pub payment_method: String,
    pub remarks: Option<String>,
    pub status: FeatureRequestStatus,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FeatureRequest {
    pub fn submit(
        property_id: PropertyId,
        partner_id: PartnerId,
        duration_days: u32,
        payment_method: &str,
        remarks: Option<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if duration_days == 0 || duration_days > MAX_FEATURE_DAYS {
            return Err(ValidationError::out_of_range(
                "duration_days",
                1,
                i64::from(MAX_FEATURE_DAYS),
                i64::from(duration_days),
            ));
        }
        Ok(Self {
            id: FeatureRequestId::new(),
            property_id,
            partner_id,
            duration_days,
            payment_method: require_text("payment_method", payment_method)?,
            remarks: remarks
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            status: FeatureRequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn approve(&mut self, admin: &Administrator, now: Timestamp) -> Result<(), TransitionError> {
        self.decide(FeatureRequestStatus::Approved, admin, now)
    }

    pub fn reject(&mut self, admin: &Administrator, now: Timestamp) -> Result<(), TransitionError> {
        self.decide(FeatureRequestStatus::Rejected, admin, now)
    }

    fn decide(
        &mut self,
        target: FeatureRequestStatus,
        admin: &Administrator,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.status = self.status.transition_to(target)?;
        self.reviewed_by = Some(admin.user_id().clone());
        self.reviewed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

impl OwnedByPartner for FeatureRequest {
    fn owner_partner_id(&self) -> PartnerId {
        self.partner_id
    }
}

impl Authorizable for FeatureRequest {
    const RESOURCE_TYPE: &'static str = "FeatureRequest";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
