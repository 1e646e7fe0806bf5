//! Repository trait for owners and their API tokens.

use crate::domain::entities::{ApiToken, NewOwner, Owner};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for owner registration and token management.
///
/// Tokens are looked up by their HMAC-SHA256 digest; raw tokens never reach storage.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgOwnerRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryOwnerRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Registers a new owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username or email is taken.
    async fn create_owner(&self, new_owner: NewOwner) -> Result<Owner, AppError>;

    async fn find_owner_by_id(&self, id: i64) -> Result<Option<Owner>, AppError>;

    async fn find_owner_by_username(&self, username: &str) -> Result<Option<Owner>, AppError>;

    async fn list_owners(&self) -> Result<Vec<Owner>, AppError>;

    /// Resolves a token digest to the owning owner's id.
    ///
    /// Returns `Ok(None)` for unknown or revoked tokens.
    async fn find_owner_id_by_token_hash(&self, token_hash: &str)
    -> Result<Option<i64>, AppError>;

    /// Records that a token was just used.
    async fn touch_token(&self, token_hash: &str) -> Result<(), AppError>;

    /// Stores a new token digest for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the digest already exists.
    async fn create_token(
        &self,
        owner_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError>;

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    async fn find_token_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError>;

    async fn find_token_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError>;

    /// Revokes a token. Already revoked tokens are left untouched.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
