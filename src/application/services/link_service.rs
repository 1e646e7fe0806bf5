//! Short link lifecycle: creation, redirect resolution, listing, update and retirement.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::IdentityResolver;
use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;

/// Maximum number of code candidates tried before giving up.
pub const MAX_ATTEMPTS: usize = 10;

/// Visibility rules for owner listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingPolicy {
    /// When true, retired links are included in `list_for_owner`.
    pub include_retired: bool,
}

/// Service orchestrating the short link lifecycle.
///
/// Stateless between calls: all shared state lives behind [`LinkRepository`].
///
/// # Known limitations
///
/// - The access counter is incremented read-then-write. Two concurrent redirects of
///   the same code may both write the same total, under-counting by one.
/// - The uniqueness check on creation is not transactional. Two concurrent creations
///   may pick the same code; the store's unique index rejects the loser with
///   [`AppError::Conflict`].
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    identity: Arc<dyn IdentityResolver>,
    generator: Arc<dyn CodeGenerator>,
    policy: ListingPolicy,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        identity: Arc<dyn IdentityResolver>,
        generator: Arc<dyn CodeGenerator>,
        policy: ListingPolicy,
    ) -> Self {
        Self {
            link_repository,
            identity,
            generator,
            policy,
        }
    }

    /// Shortens `original_url`, attaching the caller as owner when the credential resolves.
    ///
    /// # Ownership
    ///
    /// Attachment is best-effort: an unknown credential or a failing identity backend
    /// produces an anonymous link instead of an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or contains control characters.
    /// Returns [`AppError::ShorteningExhausted`] if every candidate within
    /// [`MAX_ATTEMPTS`] collided with an active link.
    /// Storage errors are propagated.
    pub async fn create_short_link(
        &self,
        original_url: String,
        credential: Option<&str>,
    ) -> Result<Link, AppError> {
        ensure_url(&original_url)?;

        let short_code = self.generate_unique_code(&original_url).await?;
        let owner_id = self.resolve_owner(credential).await;

        let link = self
            .link_repository
            .create(NewLink {
                original_url,
                short_code,
                owner_id,
            })
            .await?;

        metrics::counter!("links_created_total").increment(1);
        info!(
            link_id = link.id,
            short_code = %link.short_code,
            owned = link.owner_id.is_some(),
            "Short link created"
        );

        Ok(link)
    }

    /// Resolves a short code to its redirect target and counts the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or its link is retired.
    /// Retired links are reported exactly like unknown ones.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        let link = self
            .link_repository
            .find_by_code(short_code)
            .await?
            .filter(Link::is_active)
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": short_code }))
            })?;

        self.link_repository
            .update(link.id, LinkPatch::access_count(link.access_count + 1))
            .await?;

        metrics::counter!("redirects_total").increment(1);
        debug!(link_id = link.id, short_code, "Redirect resolved");

        Ok(link.original_url)
    }

    /// Lists links owned by the caller.
    ///
    /// An absent or unresolvable credential yields an empty list, never an error.
    /// Retired links are included only when [`ListingPolicy::include_retired`] is set.
    pub async fn list_for_owner(&self, credential: Option<&str>) -> Result<Vec<Link>, AppError> {
        let Some(owner_id) = self.resolve_owner(credential).await else {
            return Ok(Vec::new());
        };

        let links = self.link_repository.find_all_by_owner(owner_id).await?;

        Ok(if self.policy.include_retired {
            links
        } else {
            links.into_iter().filter(Link::is_active).collect()
        })
    }

    /// Retrieves a link by id, retired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: i64) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Changes the redirect target of an active link.
    ///
    /// Returns the number of affected rows: `0` if the link is retired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or contains control characters.
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn update(&self, id: i64, original_url: String) -> Result<u64, AppError> {
        ensure_url(&original_url)?;

        let link = self.get_link(id).await?;
        self.apply_update(&link, original_url).await
    }

    /// Retires a link. The row, its code and its history stay in storage.
    ///
    /// Returns the number of affected rows: `0` if the link was already retired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn soft_delete(&self, id: i64) -> Result<u64, AppError> {
        let link = self.get_link(id).await?;
        self.apply_retire(&link).await
    }

    /// [`Self::update`] restricted to links owned by `owner_id`.
    ///
    /// Links owned by someone else are reported as [`AppError::NotFound`].
    pub async fn update_for_owner(
        &self,
        owner_id: i64,
        id: i64,
        original_url: String,
    ) -> Result<u64, AppError> {
        ensure_url(&original_url)?;

        let link = self.get_owned_link(owner_id, id).await?;
        self.apply_update(&link, original_url).await
    }

    /// [`Self::soft_delete`] restricted to links owned by `owner_id`.
    pub async fn soft_delete_for_owner(&self, owner_id: i64, id: i64) -> Result<u64, AppError> {
        let link = self.get_owned_link(owner_id, id).await?;
        self.apply_retire(&link).await
    }

    /// Retrieves a link by id if `owner_id` owns it.
    pub async fn get_owned_link(&self, owner_id: i64, id: i64) -> Result<Link, AppError> {
        let link = self.get_link(id).await?;

        if !link.is_owned_by(owner_id) {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }

        Ok(link)
    }

    /// Constructs the public short URL from the service base URL and a code.
    pub fn short_url(&self, base_url: &str, code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), code)
    }

    async fn apply_update(&self, link: &Link, original_url: String) -> Result<u64, AppError> {
        if !link.is_active() {
            debug!(link_id = link.id, "Update skipped, link is retired");
            return Ok(0);
        }

        let affected = self
            .link_repository
            .update(link.id, LinkPatch::original_url(original_url))
            .await?;

        info!(link_id = link.id, affected, "Link updated");
        Ok(affected)
    }

    async fn apply_retire(&self, link: &Link) -> Result<u64, AppError> {
        let Some(at) = link.lifecycle().retire(Utc::now()) else {
            debug!(link_id = link.id, "Delete skipped, link already retired");
            return Ok(0);
        };

        let affected = self
            .link_repository
            .update(link.id, LinkPatch::retire(at))
            .await?;

        info!(link_id = link.id, affected, "Link retired");
        Ok(affected)
    }

    /// Generates a code not held by any active link, trying at most [`MAX_ATTEMPTS`] times.
    ///
    /// A retired link holding the candidate does not count as a collision.
    async fn generate_unique_code(&self, original_url: &str) -> Result<String, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let code = self.generator.generate(original_url);

            let taken = self
                .link_repository
                .find_by_code(&code)
                .await?
                .is_some_and(|link| link.is_active());

            if !taken {
                return Ok(code);
            }

            debug!(attempt, code = %code, "Short code collision");
        }

        metrics::counter!("shortening_exhausted_total").increment(1);
        warn!(attempts = MAX_ATTEMPTS, "Could not find a free short code");

        Err(AppError::exhausted(
            "Could not shorten the URL right now, please try again later",
            json!({ "attempts": MAX_ATTEMPTS }),
        ))
    }

    /// Resolves a credential to an owner id, degrading any failure to `None`.
    async fn resolve_owner(&self, credential: Option<&str>) -> Option<i64> {
        let credential = credential?;

        match self.identity.resolve(credential).await {
            Ok(owner_id) => owner_id,
            Err(e) => {
                warn!(error = %e, "Identity resolution failed, continuing anonymously");
                None
            }
        }
    }
}

fn ensure_url(original_url: &str) -> Result<(), AppError> {
    if original_url.trim().is_empty() {
        return Err(AppError::bad_request(
            "URL must not be empty",
            json!({ "field": "url" }),
        ));
    }
    // must be usable verbatim as a Location header
    if original_url.chars().any(char::is_control) {
        return Err(AppError::bad_request(
            "URL must not contain control characters",
            json!({ "field": "url" }),
        ));
    }
    Ok(())
}
