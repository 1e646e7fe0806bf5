//! Bearer token identity resolution.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::IdentityResolver;
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the same
/// function when issuing tokens, so both sides must share the secret.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves bearer tokens to owner ids.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before lookup.
/// An attacker with read-only access to the database cannot verify or forge tokens
/// without the server-side secret.
pub struct TokenIdentityResolver {
    repository: Arc<dyn OwnerRepository>,
    signing_secret: String,
}

impl TokenIdentityResolver {
    /// Creates a new resolver.
    ///
    /// # Arguments
    ///
    /// - `repository` - owner repository holding the token digests
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(repository: Arc<dyn OwnerRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }
}

#[async_trait]
impl IdentityResolver for TokenIdentityResolver {
    /// Looks up the owner of a non-revoked token.
    ///
    /// On success the token's `last_used_at` is refreshed; a failure to do so is ignored.
    async fn resolve(&self, credential: &str) -> Result<Option<i64>, AppError> {
        if credential.is_empty() {
            return Ok(None);
        }

        let token_hash = hash_token(&self.signing_secret, credential);

        let Some(owner_id) = self
            .repository
            .find_owner_id_by_token_hash(&token_hash)
            .await?
        else {
            tracing::debug!("Credential did not resolve to an owner");
            return Ok(None);
        };

        if let Err(e) = self.repository.touch_token(&token_hash).await {
            tracing::warn!(error = %e, owner_id, "Failed to record token usage");
        }

        Ok(Some(owner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockOwnerRepository;
    use serde_json::json;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    #[tokio::test]
    async fn test_resolve_known_token() {
        let mut mock_repo = MockOwnerRepository::new();
        let expected_hash = hash_token(&test_secret(), "valid-token");

        mock_repo
            .expect_find_owner_id_by_token_hash()
            .withf(move |hash| hash == &expected_hash)
            .times(1)
            .returning(|_| Ok(Some(42)));
        mock_repo
            .expect_touch_token()
            .times(1)
            .returning(|_| Ok(()));

        let resolver = TokenIdentityResolver::new(Arc::new(mock_repo), test_secret());

        assert_eq!(resolver.resolve("valid-token").await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let mut mock_repo = MockOwnerRepository::new();
        mock_repo
            .expect_find_owner_id_by_token_hash()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_touch_token().times(0);

        let resolver = TokenIdentityResolver::new(Arc::new(mock_repo), test_secret());

        assert_eq!(resolver.resolve("invalid-token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_empty_credential_skips_storage() {
        let mock_repo = MockOwnerRepository::new();
        let resolver = TokenIdentityResolver::new(Arc::new(mock_repo), test_secret());

        assert_eq!(resolver.resolve("").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_touch_failure_is_ignored() {
        let mut mock_repo = MockOwnerRepository::new();
        mock_repo
            .expect_find_owner_id_by_token_hash()
            .returning(|_| Ok(Some(7)));
        mock_repo
            .expect_touch_token()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let resolver = TokenIdentityResolver::new(Arc::new(mock_repo), test_secret());

        assert_eq!(resolver.resolve("token").await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut mock_repo = MockOwnerRepository::new();
        mock_repo
            .expect_find_owner_id_by_token_hash()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let resolver = TokenIdentityResolver::new(Arc::new(mock_repo), test_secret());

        assert!(resolver.resolve("token").await.is_err());
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = hash_token(&test_secret(), "test-token");
        let hash2 = hash_token(&test_secret(), "test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_token(&test_secret(), "other-token"));
    }

    #[test]
    fn test_hash_token_secret_matters() {
        assert_ne!(hash_token("secret-a", "token"), hash_token("secret-b", "token"));
    }

    #[test]
    fn test_hash_token_with_empty_secret() {
        let hash = hash_token("", "token");

        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash, hash_token(&test_secret(), "token"));
    }
}
