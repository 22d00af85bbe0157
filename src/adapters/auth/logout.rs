//! Session revocation against the hosted auth service.
//!
//! `POST {auth_url}/auth/v1/logout` with the user's bearer token revokes
//! every refresh token of that session. A 401 means the session is already
//! gone, which is what the caller wanted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionTerminator;

pub struct HttpSessionTerminator {
    client: reqwest::Client,
    logout_url: String,
    api_key: SecretString,
}

impl HttpSessionTerminator {
    pub fn new(
        auth_url: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            logout_url: logout_url(auth_url),
            api_key,
        })
    }

    pub fn logout_url(&self) -> &str {
        &self.logout_url
    }
}

fn logout_url(auth_url: &str) -> String {
    format!("{}/auth/v1/logout", auth_url.trim_end_matches('/'))
}

#[async_trait]
impl SessionTerminator for HttpSessionTerminator {
    async fn sign_out(&self, user: &AuthenticatedUser) -> Result<(), AuthError> {
        let response = self
            .client
            .post(&self.logout_url)
            .bearer_auth(user.access_token())
            .header("apikey", self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Logout request failed");
                AuthError::service_unavailable(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {
                tracing::debug!(user_id = %user.id, "Session revoked");
                Ok(())
            }
            StatusCode::UNAUTHORIZED => {
                tracing::debug!(user_id = %user.id, "Session already revoked");
                Ok(())
            }
            status => {
                tracing::error!(user_id = %user.id, status = %status, "Logout endpoint refused");
                Err(AuthError::service_unavailable(format!(
                    "logout endpoint returned {}",
                    status
                )))
            }
        }
    }
}

impl std::fmt::Debug for HttpSessionTerminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSessionTerminator")
            .field("logout_url", &self.logout_url)
            .finish_non_exhaustive()
    }
}
