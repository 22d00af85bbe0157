//! Mock authentication adapters for testing.
//!
//! These adapters implement the `SessionValidator` and `SessionTerminator`
//! ports without a hosted auth service.
//!
//! # Example
//!
//! ```ignore
//! use staylink::adapters::auth::MockSessionValidator;
//!
//! let validator = MockSessionValidator::new().with_test_user("valid-token", "user-123");
//! let user = validator.validate("valid-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{SessionTerminator, SessionValidator};

/// Mock session validator.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a token for a user with a generated email.
    ///
    /// A blank `user_id` is not a valid principal and is ignored.
    pub fn with_test_user(self, token: impl Into<String>, user_id: &str) -> Self {
        let token = token.into();
        match UserId::new(user_id) {
            Ok(id) => {
                let user = AuthenticatedUser::new(
                    id,
                    format!("{}@test.example.com", user_id),
                    Some(format!("Test User {}", user_id)),
                    token.clone(),
                );
                self.with_user(token, user)
            }
            Err(_) => self,
        }
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Adds a token after construction.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Mock session terminator that records every sign-out.
#[derive(Debug, Default)]
pub struct MockSessionTerminator {
    signed_out: Mutex<Vec<UserId>>,
    fail: bool,
}

impl MockSessionTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A terminator whose every call fails after being recorded.
    pub fn failing() -> Self {
        Self {
            signed_out: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Number of sign-out attempts, successful or not.
    pub fn sign_out_count(&self) -> usize {
        self.signed_out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn signed_out_users(&self) -> Vec<UserId> {
        self.signed_out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SessionTerminator for MockSessionTerminator {
    async fn sign_out(&self, user: &AuthenticatedUser) -> Result<(), AuthError> {
        self.signed_out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user.id.clone());
        if self.fail {
            return Err(AuthError::service_unavailable("logout endpoint unreachable"));
        }
        Ok(())
    }
}
