//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// In-process link store backed by a [`DashMap`].
///
/// Mirrors the PostgreSQL semantics: ids are assigned sequentially, an active link
/// blocks its short code, retired links keep their rows. Claiming a code goes
/// through the `active_codes` entry lock, so two concurrent inserts of the same
/// code cannot both succeed. Each row is updated under its shard lock.
#[derive(Debug)]
pub struct MemoryLinkRepository {
    links: DashMap<i64, Link>,
    /// Short code -> id of the active link holding it.
    active_codes: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            active_codes: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored rows, retired ones included.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let id = match self.active_codes.entry(new_link.short_code.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "links_active_short_code_key" }),
                ));
            }
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                slot.insert(id);
                id
            }
        };

        let now = Utc::now();
        let link = Link::new(
            id,
            new_link.original_url,
            new_link.short_code,
            new_link.owner_id,
            0,
            now,
            now,
            None,
        );

        self.links.insert(id, link.clone());
        Ok(link)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<u64, AppError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let released_code = {
            let Some(mut link) = self.links.get_mut(&id) else {
                return Ok(0);
            };

            if let Some(url) = patch.original_url {
                link.original_url = url;
            }
            if let Some(count) = patch.access_count {
                link.access_count = count;
            }
            if let Some(at) = patch.deleted_at {
                link.deleted_at = Some(at);
            }
            link.updated_at = Utc::now();

            patch.deleted_at.map(|_| link.short_code.clone())
        };

        // row guard is dropped before touching the index
        if let Some(code) = released_code {
            self.active_codes.remove_if(&code, |_, holder| *holder == id);
        }

        Ok(1)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .iter()
            .filter(|entry| entry.short_code == code)
            .max_by_key(|entry| (entry.is_active(), entry.id))
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .iter()
            .filter(|entry| entry.is_owned_by(owner_id))
            .map(|entry| entry.value().clone())
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_link(code: &str, owner_id: Option<i64>) -> NewLink {
        NewLink {
            original_url: format!("https://example.com/{code}"),
            short_code: code.to_string(),
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_zero_count() {
        let repo = MemoryLinkRepository::new();

        let first = repo.create(new_link("aaaaaa", None)).await.unwrap();
        let second = repo.create(new_link("bbbbbb", None)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.access_count, 0);
        assert!(first.deleted_at.is_none());
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_active_duplicate_code() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("aaaaaa", None)).await.unwrap();

        let result = repo.create(new_link("aaaaaa", None)).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_retired_code_can_be_reused_and_active_wins() {
        let repo = MemoryLinkRepository::new();
        let old = repo.create(new_link("aaaaaa", None)).await.unwrap();
        repo.update(old.id, LinkPatch::retire(Utc::now()))
            .await
            .unwrap();

        let fresh = repo.create(new_link("aaaaaa", None)).await.unwrap();
        let found = repo.find_by_code("aaaaaa").await.unwrap().unwrap();

        assert_eq!(found.id, fresh.id);
        assert!(repo.find_by_id(old.id).await.unwrap().unwrap().deleted_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_of_same_code_admit_one() {
        let repo = Arc::new(MemoryLinkRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(new_link("aaaaaa", None)).await })
            })
            .collect();

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_retiring_twice_keeps_new_holder() {
        let repo = MemoryLinkRepository::new();
        let old = repo.create(new_link("aaaaaa", None)).await.unwrap();
        repo.update(old.id, LinkPatch::retire(Utc::now()))
            .await
            .unwrap();
        let fresh = repo.create(new_link("aaaaaa", None)).await.unwrap();

        repo.update(old.id, LinkPatch::retire(Utc::now()))
            .await
            .unwrap();

        let result = repo.create(new_link("aaaaaa", None)).await;
        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
        assert_eq!(
            repo.find_by_code("aaaaaa").await.unwrap().unwrap().id,
            fresh.id
        );
    }

    #[tokio::test]
    async fn test_update_applies_patch_fields() {
        let repo = MemoryLinkRepository::new();
        let link = repo.create(new_link("aaaaaa", None)).await.unwrap();

        let affected = repo
            .update(link.id, LinkPatch::original_url("https://new.example.com"))
            .await
            .unwrap();
        repo.update(link.id, LinkPatch::access_count(5)).await.unwrap();

        let stored = repo.find_by_id(link.id).await.unwrap().unwrap();
        assert_eq!(affected, 1);
        assert_eq!(stored.original_url, "https://new.example.com");
        assert_eq!(stored.access_count, 5);
        assert_eq!(stored.short_code, "aaaaaa");
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let repo = MemoryLinkRepository::new();
        assert_eq!(repo.update(99, LinkPatch::access_count(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_all_by_owner() {
        let repo = MemoryLinkRepository::new();
        repo.create(new_link("aaaaaa", Some(1))).await.unwrap();
        repo.create(new_link("bbbbbb", Some(2))).await.unwrap();
        repo.create(new_link("cccccc", Some(1))).await.unwrap();
        repo.create(new_link("dddddd", None)).await.unwrap();

        let links = repo.find_all_by_owner(1).await.unwrap();

        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.owner_id == Some(1)));
    }
}
