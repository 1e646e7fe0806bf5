//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened URL with its owner and access counter.
///
/// Links are never physically removed. Setting `deleted_at` retires a link: it stops
/// redirecting and rejects edits but stays readable by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub owner_id: Option<i64>,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        owner_id: Option<i64>,
        access_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            owner_id,
            access_count,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Current lifecycle state, derived from `deleted_at`.
    pub fn lifecycle(&self) -> Lifecycle {
        match self.deleted_at {
            Some(at) => Lifecycle::Retired(at),
            None => Lifecycle::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }

    /// Returns true if `owner_id` owns this link. Anonymous links have no owner.
    pub fn is_owned_by(&self, owner_id: i64) -> bool {
        self.owner_id == Some(owner_id)
    }
}

/// The two states a link moves through.
///
/// `Retired` is terminal for redirects and edits; historical lookups by id still
/// see retired links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Retired(DateTime<Utc>),
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    /// Transition to `Retired` at `at`.
    ///
    /// Returns the retirement timestamp to persist, or `None` when the link is
    /// already retired and nothing should be written.
    pub fn retire(self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Lifecycle::Active => Some(at),
            Lifecycle::Retired(_) => None,
        }
    }
}

/// Input data for creating a new link. Counter starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
    pub owner_id: Option<i64>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged. `short_code` and `owner_id` are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub original_url: Option<String>,
    pub access_count: Option<i64>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl LinkPatch {
    pub fn original_url(url: impl Into<String>) -> Self {
        Self {
            original_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn access_count(count: i64) -> Self {
        Self {
            access_count: Some(count),
            ..Default::default()
        }
    }

    pub fn retire(at: DateTime<Utc>) -> Self {
        Self {
            deleted_at: Some(at),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.access_count.is_none() && self.deleted_at.is_none()
    }
}
