//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Lookup misses are `Ok(None)` / empty vectors, never errors. Every method may fail
/// with [`AppError::Internal`] when the underlying store fails.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link with `access_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an active link already holds the short code.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Applies a partial update and returns the number of affected rows.
    ///
    /// Writes are single-row atomic; no cross-row transaction is implied.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<u64, AppError>;

    /// Finds a link by short code.
    ///
    /// When a retired code has been reused, the active link wins.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by id, whether active or retired.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Returns every link belonging to `owner_id`, retired ones included.
    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;

    /// Connectivity check used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
