//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what the `SessionValidator` port produces from a
//! bearer token issued by the hosted auth service. It carries the raw access
//! token as well, because a denied session has to be revoked with it.

use super::UserId;
use thiserror::Error;

/// Principal extracted from a validated access token.
#[derive(Clone)]
pub struct AuthenticatedUser {
    /// Token subject.
    pub id: UserId,

    /// Email claim.
    pub email: String,

    /// Display name if the token carries one.
    pub display_name: Option<String>,

    /// The bearer token the session was opened with.
    access_token: String,
}

impl AuthenticatedUser {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            access_token: access_token.into(),
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Raw access token, needed to revoke the session.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

/// Authentication errors that can occur during token validation or sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The auth service is unreachable or answered with an error.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "host@example.com",
            display_name.map(str::to_string),
            "token-abc",
        )
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(user(Some("Amina")).display_name_or_email(), "Amina");
        assert_eq!(user(None).display_name_or_email(), "host@example.com");
    }

    #[test]
    fn debug_output_redacts_token() {
        let rendered = format!("{:?}", user(None));
        assert!(!rendered.contains("token-abc"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn token_errors_require_reauthentication() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }
}
