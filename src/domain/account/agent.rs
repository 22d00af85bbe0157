//! Referral agent account aggregate and referral codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::partner::trim_optional;
use super::{AccountDecision, AccountStatus};
use crate::domain::foundation::{
    require_text, AgentId, OwnedByUser, Percentage, StateMachine, Timestamp, TransitionError,
    UserId, ValidationError,
};
use crate::domain::session::Administrator;

const CODE_PREFIX: &str = "REF-";
const CODE_BODY_LEN: usize = 8;

/// Default per-agent rate stored on new accounts.
pub const DEFAULT_AGENT_RATE: Percentage = Percentage::clamped(10);

/// Shareable code a partner enters at registration, e.g. `REF-3F9A0C1B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Generates a fresh random code.
    pub fn generate() -> Self {
        let body: String = Uuid::new_v4()
            .simple()
            .to_string()
            .to_uppercase()
            .chars()
            .take(CODE_BODY_LEN)
            .collect();
        Self(format!("{}{}", CODE_PREFIX, body))
    }

    /// Parses user input, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim().to_uppercase();
        let body = code.strip_prefix(CODE_PREFIX).ok_or_else(|| {
            ValidationError::invalid_format("referral_code", "must start with REF-")
        })?;
        if body.len() != CODE_BODY_LEN || !body.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::invalid_format(
                "referral_code",
                "expected 8 letters or digits after REF-",
            ));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferralCode> for String {
    fn from(code: ReferralCode) -> Self {
        code.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Referral agent account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralAgent {
    pub id: AgentId,
    pub user_id: UserId,
    pub full_name: String,
    pub referral_code: ReferralCode,
    /// Per-agent rate. Whether it applies is decided by `CommissionPolicy`.
    pub commission_rate: Percentage,
    pub payout_details: Option<String>,
    pub status: AccountStatus,
    pub reviewed_by: Option<UserId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReferralAgent {
    pub fn register(
        user_id: UserId,
        full_name: &str,
        payout_details: Option<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: AgentId::new(),
            user_id,
            full_name: require_text("full_name", full_name)?,
            referral_code: ReferralCode::generate(),
            commission_rate: DEFAULT_AGENT_RATE,
            payout_details: trim_optional(payout_details),
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

    pub fn update_payout_details(&mut self, details: Option<String>, now: Timestamp) {
        self.payout_details = trim_optional(details);
        self.updated_at = now;
    }

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

impl OwnedByUser for ReferralAgent {
    fn owner_user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_parse_back() {
        let code = ReferralCode::generate();
        assert!(code.as_str().starts_with("REF-"));
        assert_eq!(code.as_str().len(), 12);
        assert_eq!(ReferralCode::parse(code.as_str()).unwrap(), code);
    }

    #[test]
    fn generated_codes_differ() {
        assert_ne!(ReferralCode::generate(), ReferralCode::generate());
    }

    #[test]
    fn parse_normalises_case_and_whitespace() {
        let code = ReferralCode::parse("  ref-ab12cd34 ").unwrap();
        assert_eq!(code.as_str(), "REF-AB12CD34");
    }

    #[test]
    fn parse_rejects_malformed_codes() {
        assert!(ReferralCode::parse("AB12CD34").is_err());
        assert!(ReferralCode::parse("REF-123").is_err());
        assert!(ReferralCode::parse("REF-12$4ABCD").is_err());
    }

    #[test]
    fn register_uses_default_rate_and_pending_status() {
        let agent = ReferralAgent::register(
            UserId::new("agent-user").unwrap(),
            "Asha Menon",
            Some("UPI asha@bank".to_string()),
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(agent.status, AccountStatus::Pending);
        assert_eq!(agent.commission_rate.value(), 10);
        assert_eq!(agent.payout_details.as_deref(), Some("UPI asha@bank"));
    }

    #[test]
    fn rejected_agent_stays_rejected() {
        let admin = Administrator::new(UserId::new("admin").unwrap());
        let mut agent =
            ReferralAgent::register(UserId::new("a").unwrap(), "Ravi", None, Timestamp::now())
                .unwrap();
        agent
            .review(AccountDecision::Reject, &admin, Timestamp::now())
            .unwrap();
        let err = agent
            .review(AccountDecision::Approve, &admin, Timestamp::now())
            .unwrap_err();
        assert_eq!(err.from, "rejected");
    }
}
