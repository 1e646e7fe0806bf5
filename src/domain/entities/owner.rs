//! Owner and API token entities.

use chrono::{DateTime, Utc};

/// An authenticated user that can own links.
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering an owner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOwner {
    pub username: String,
    pub email: String,
}

/// A bearer credential issued to an owner.
///
/// Only the HMAC-SHA256 digest of the raw token is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiToken {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}
