//! In-memory implementation of owner repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{ApiToken, NewOwner, Owner};
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;

/// In-process owner and token store backed by [`DashMap`]s.
#[derive(Debug)]
pub struct MemoryOwnerRepository {
    owners: DashMap<i64, Owner>,
    tokens: DashMap<i64, ApiToken>,
    next_owner_id: AtomicI64,
    next_token_id: AtomicI64,
}

impl MemoryOwnerRepository {
    pub fn new() -> Self {
        Self {
            owners: DashMap::new(),
            tokens: DashMap::new(),
            next_owner_id: AtomicI64::new(1),
            next_token_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryOwnerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OwnerRepository for MemoryOwnerRepository {
    async fn create_owner(&self, new_owner: NewOwner) -> Result<Owner, AppError> {
        let taken = self
            .owners
            .iter()
            .any(|o| o.username == new_owner.username || o.email == new_owner.email);

        if taken {
            return Err(AppError::conflict(
                "Owner already exists",
                json!({ "username": new_owner.username }),
            ));
        }

        let owner = Owner {
            id: self.next_owner_id.fetch_add(1, Ordering::SeqCst),
            username: new_owner.username,
            email: new_owner.email,
            created_at: Utc::now(),
        };

        self.owners.insert(owner.id, owner.clone());
        Ok(owner)
    }

    async fn find_owner_by_id(&self, id: i64) -> Result<Option<Owner>, AppError> {
        Ok(self.owners.get(&id).map(|o| o.value().clone()))
    }

    async fn find_owner_by_username(&self, username: &str) -> Result<Option<Owner>, AppError> {
        Ok(self
            .owners
            .iter()
            .find(|o| o.username == username)
            .map(|o| o.value().clone()))
    }

    async fn list_owners(&self) -> Result<Vec<Owner>, AppError> {
        let mut owners: Vec<Owner> = self.owners.iter().map(|o| o.value().clone()).collect();
        owners.sort_by_key(|o| o.id);
        Ok(owners)
    }

    async fn find_owner_id_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<i64>, AppError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.token_hash == token_hash && !t.is_revoked())
            .map(|t| t.owner_id))
    }

    async fn touch_token(&self, token_hash: &str) -> Result<(), AppError> {
        for mut token in self.tokens.iter_mut() {
            if token.token_hash == token_hash && !token.is_revoked() {
                token.last_used_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn create_token(
        &self,
        owner_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        if !self.owners.contains_key(&owner_id) {
            return Err(AppError::not_found(
                "Owner not found",
                json!({ "owner_id": owner_id }),
            ));
        }

        if self.tokens.iter().any(|t| t.token_hash == token_hash) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_tokens_token_hash_key" }),
            ));
        }

        let token = ApiToken {
            id: self.next_token_id.fetch_add(1, Ordering::SeqCst),
            owner_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };

        self.tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.value().clone()).collect();
        tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tokens)
    }

    async fn find_token_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.tokens.get(&id).map(|t| t.value().clone()))
    }

    async fn find_token_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .filter(|t| t.name == name)
            .max_by_key(|t| t.id)
            .map(|t| t.value().clone()))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        if let Some(mut token) = self.tokens.get_mut(&id)
            && token.revoked_at.is_none()
        {
            token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewOwner {
        NewOwner {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_owner_and_lookup() {
        let repo = MemoryOwnerRepository::new();
        let owner = repo.create_owner(alice()).await.unwrap();

        let found = repo.find_owner_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, owner.id);
        assert!(repo.find_owner_by_id(owner.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_owner_conflicts() {
        let repo = MemoryOwnerRepository::new();
        repo.create_owner(alice()).await.unwrap();

        let result = repo.create_owner(alice()).await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_token_resolution_and_revocation() {
        let repo = MemoryOwnerRepository::new();
        let owner = repo.create_owner(alice()).await.unwrap();
        let token = repo.create_token(owner.id, "laptop", "hash-1").await.unwrap();

        assert_eq!(
            repo.find_owner_id_by_token_hash("hash-1").await.unwrap(),
            Some(owner.id)
        );

        repo.touch_token("hash-1").await.unwrap();
        assert!(
            repo.find_token_by_id(token.id)
                .await
                .unwrap()
                .unwrap()
                .last_used_at
                .is_some()
        );

        repo.revoke_token(token.id).await.unwrap();
        assert_eq!(repo.find_owner_id_by_token_hash("hash-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_token_for_unknown_owner() {
        let repo = MemoryOwnerRepository::new();
        let result = repo.create_token(99, "laptop", "hash-1").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
