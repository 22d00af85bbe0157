//! Partner account repository port.

use async_trait::async_trait;

use crate::domain::account::{AccountStatus, PartnerAccount};
use crate::domain::foundation::{DomainError, PartnerId, UserId};

/// Persistence for partner accounts.
///
/// Implementations must enforce one partner account per `user_id`.
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the principal already has a partner account
    /// - `DatabaseError` on persistence failure
    async fn save(&self, partner: &PartnerAccount) -> Result<(), DomainError>;

    /// Overwrite an existing account.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account does not exist
    async fn update(&self, partner: &PartnerAccount) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PartnerId) -> Result<Option<PartnerAccount>, DomainError>;

    /// Primary lookup during session resolution.
    async fn find_by_user_id(&self, user_id: &UserId)
        -> Result<Option<PartnerAccount>, DomainError>;

    /// All accounts, optionally narrowed to one status, newest first.
    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<PartnerAccount>, DomainError>;
}
