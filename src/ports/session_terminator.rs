//! Session termination port.
//!
//! Revokes a live session at the auth service. Every denied session
//! resolution goes through here before the denial is reported.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait SessionTerminator: Send + Sync {
    /// Revoke the session `user` was authenticated with.
    ///
    /// # Errors
    ///
    /// - `ServiceUnavailable` if the auth service could not be reached or
    ///   refused the request
    async fn sign_out(&self, user: &AuthenticatedUser) -> Result<(), AuthError>;
}
