//! Authorization results for logged access decisions.
//!
//! Handlers build an `AuthorizationResult`, log it, then turn it into a
//! `Result` with `into_result`. Denials carry enough context for an audit line.

use super::{DomainError, ErrorCode, OwnedByPartner, PartnerId};

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    pub granted: bool,

    /// The resource type being accessed (e.g., "Property", "Booking").
    pub resource_type: &'static str,

    pub resource_id: String,

    /// Who asked.
    pub actor: String,

    pub denial_reason: Option<String>,
}

impl AuthorizationResult {
    pub fn granted(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            granted: true,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            denial_reason: None,
        }
    }

    pub fn denied(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            granted: false,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            denial_reason: Some(reason.into()),
        }
    }

    /// Returns `Ok(())` if granted, `Err(Forbidden)` if denied.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.granted {
            return Ok(());
        }
        Err(DomainError::new(
            ErrorCode::Forbidden,
            self.denial_reason
                .unwrap_or_else(|| "Access denied".to_string()),
        )
        .with_detail("resource_type", self.resource_type)
        .with_detail("resource_id", self.resource_id)
        .with_detail("actor", self.actor))
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }
}

/// Resources that can appear in authorization logs.
pub trait Authorizable {
    const RESOURCE_TYPE: &'static str;

    fn resource_id(&self) -> String;
}

/// Grants access when `partner_id` owns the resource.
pub fn check_partner_ownership<T>(resource: &T, partner_id: PartnerId) -> AuthorizationResult
where
    T: OwnedByPartner + Authorizable,
{
    if resource.is_owned_by_partner(partner_id) {
        AuthorizationResult::granted(T::RESOURCE_TYPE, resource.resource_id(), partner_id.to_string())
    } else {
        AuthorizationResult::denied(
            T::RESOURCE_TYPE,
            resource.resource_id(),
            partner_id.to_string(),
            format!(
                "Partner {} does not own {} {}",
                partner_id,
                T::RESOURCE_TYPE,
                resource.resource_id()
            ),
        )
    }
}
