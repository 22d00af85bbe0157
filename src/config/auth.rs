//! Authentication configuration
//!
//! Tokens are issued by the hosted auth service and signed with a shared
//! HS256 secret. The service's anon key authorizes calls to its logout
//! endpoint.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Shortest HS256 secret accepted.
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth service
    pub url: String,

    /// Public API key sent with auth service calls
    pub anon_key: SecretString,

    /// Shared secret that signs access tokens
    pub jwt_secret: SecretString,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub jwt_audience: String,

    /// Expected `iss` claim, unchecked when unset
    pub jwt_issuer: Option<String>,

    /// Timeout for auth service calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl AuthConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// In production the auth URL must be HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__URL"));
        }
        if self.anon_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ANON_KEY"));
        }
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_SECRET_LEN));
        }
        if *environment == Environment::Production && !self.url.starts_with("https://") {
            return Err(ValidationError::AuthUrlMustBeHttps);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: SecretString::new(String::new()),
            jwt_secret: SecretString::new(String::new()),
            jwt_audience: default_audience(),
            jwt_issuer: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_audience() -> String {
    "authenticated".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(url: &str) -> AuthConfig {
        AuthConfig {
            url: url.to_string(),
            anon_key: SecretString::new("anon-key".to_string()),
            jwt_secret: SecretString::new("s".repeat(MIN_SECRET_LEN)),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.jwt_audience, "authenticated");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_fields_are_named() {
        assert_eq!(
            AuthConfig::default().validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__URL"))
        );
        let config = AuthConfig {
            jwt_secret: SecretString::new(String::new()),
            ..valid("https://auth.example.com")
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"))
        );
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = AuthConfig {
            jwt_secret: SecretString::new("short".to_string()),
            ..valid("https://auth.example.com")
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::JwtSecretTooShort(MIN_SECRET_LEN))
        );
    }

    #[test]
    fn test_production_requires_https() {
        let config = valid("http://localhost:54321");
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::AuthUrlMustBeHttps)
        );
        assert!(valid("https://auth.example.com")
            .validate(&Environment::Production)
            .is_ok());
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let rendered = format!("{:?}", valid("https://auth.example.com"));
        assert!(!rendered.contains("anon-key"));
    }
}
