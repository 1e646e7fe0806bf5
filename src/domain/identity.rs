//! Identity resolution contract.

use crate::error::AppError;
use async_trait::async_trait;

/// Maps an opaque caller credential to an owner id.
///
/// An unknown credential is a normal outcome (`Ok(None)`), not an error. `Err` is
/// reserved for failures of the identity backend itself; callers decide whether
/// such failures are fatal.
///
/// # Implementations
///
/// - [`crate::application::services::TokenIdentityResolver`] - Bearer tokens stored as HMAC digests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, credential: &str) -> Result<Option<i64>, AppError>;
}
