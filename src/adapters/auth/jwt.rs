//! Shared-secret JWT adapter for the hosted auth service.
//!
//! The auth service signs access tokens with HS256 using a project secret.
//! This adapter implements `SessionValidator` by:
//!
//! 1. Verifying the signature against the configured secret
//! 2. Validating audience, expiry and (when configured) issuer
//! 3. Mapping claims to the domain `AuthenticatedUser`
//!
//! # Example
//!
//! ```ignore
//! use secrecy::SecretString;
//! use staylink::adapters::auth::{JwtConfig, JwtSessionValidator};
//!
//! let validator = JwtSessionValidator::new(JwtConfig::new(
//!     SecretString::new("project-jwt-secret".to_string()),
//!     "authenticated",
//! ));
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Configuration for [`JwtSessionValidator`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: SecretString,

    /// Expected `aud` claim.
    pub audience: String,

    /// Expected `iss` claim, unchecked when `None`.
    pub issuer: Option<String>,
}

impl JwtConfig {
    pub fn new(secret: SecretString, audience: impl Into<String>) -> Self {
        Self {
            secret,
            audience: audience.into(),
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SessionClaims {
    pub sub: String,

    pub exp: i64,

    #[serde(default)]
    pub aud: Audience,

    #[serde(default)]
    pub iss: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Profile fields the auth service copies into the token at sign-up.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

pub struct JwtSessionValidator {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());
        Self {
            config,
            decoding_key,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        match &self.config.issuer {
            Some(issuer) => {
                validation.set_issuer(&[issuer]);
                validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
            }
            None => validation.set_required_spec_claims(&["exp", "sub", "aud"]),
        }
        validation
    }

    fn decode_claims(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                    tracing::warn!(error = %e, "Token issued for another audience or issuer");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;

        if !claims.aud.contains(&self.config.audience) {
            tracing::warn!(aud = ?claims.aud, "Audience mismatch after validation");
            return Err(AuthError::InvalidToken);
        }

        let email = claims.email.ok_or_else(|| {
            tracing::warn!("Token missing email claim");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Token subject is blank");
            AuthError::InvalidToken
        })?;

        let display_name = claims.user_metadata.full_name.or(claims.user_metadata.name);
        Ok(AuthenticatedUser::new(user_id, email, display_name, token))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("audience", &self.config.audience)
            .field("issuer", &self.config.issuer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "super-secret-jwt-token-with-at-least-32-characters";

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(JwtConfig::new(
            SecretString::new(SECRET.to_string()),
            "authenticated",
        ))
    }

    fn claims(exp_offset_secs: i64) -> SessionClaims {
        SessionClaims {
            sub: "b4a1-user".to_string(),
            exp: Utc::now().timestamp() + exp_offset_secs,
            aud: Audience::Single("authenticated".to_string()),
            iss: Some("https://auth.staylink.test/auth/v1".to_string()),
            email: Some("host@example.com".to_string()),
            user_metadata: UserMetadata {
                full_name: Some("Amina Host".to_string()),
                name: None,
            },
        }
    }

    fn sign(claims: &SessionClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Audience Parsing Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn audience_single_and_multiple() {
        assert!(Audience::Single("a".into()).contains("a"));
        assert!(Audience::Multiple(vec!["a".into(), "b".into()]).contains("b"));
        assert!(!Audience::None.contains("a"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_token_maps_to_user() {
        let token = sign(&claims(3600), SECRET);
        let user = validator().validate(&token).await.unwrap();
        assert_eq!(user.id.as_str(), "b4a1-user");
        assert_eq!(user.email, "host@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Amina Host"));
        assert_eq!(user.access_token(), token);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let token = sign(&claims(3600), "a-completely-different-secret-value-000");
        assert_eq!(
            validator().validate(&token).await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let token = sign(&claims(-3600), SECRET);
        assert_eq!(
            validator().validate(&token).await.unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[tokio::test]
    async fn wrong_audience_is_invalid() {
        let mut c = claims(3600);
        c.aud = Audience::Single("anon".to_string());
        let token = sign(&c, SECRET);
        assert_eq!(
            validator().validate(&token).await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn issuer_is_checked_when_configured() {
        let strict = JwtSessionValidator::new(
            JwtConfig::new(SecretString::new(SECRET.to_string()), "authenticated")
                .with_issuer("https://other.example.com"),
        );
        let token = sign(&claims(3600), SECRET);
        assert!(strict.validate(&token).await.is_err());
    }

    #[tokio::test]
    async fn missing_email_is_invalid() {
        let mut c = claims(3600);
        c.email = None;
        let token = sign(&c, SECRET);
        assert!(validator().validate(&token).await.is_err());
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(
            validator().validate("not-a-jwt").await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", validator());
        assert!(!rendered.contains(SECRET));
    }
}
