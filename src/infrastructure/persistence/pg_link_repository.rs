//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str =
    "id, original_url, short_code, owner_id, access_count, created_at, updated_at, deleted_at";

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    original_url: String,
    short_code: String,
    owner_id: Option<i64>,
    access_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.original_url,
            r.short_code,
            r.owner_id,
            r.access_count,
            r.created_at,
            r.updated_at,
            r.deleted_at,
        )
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uniqueness of `short_code` among active links is enforced by a partial unique index.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row: LinkRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO links (original_url, short_code, owner_id)
            VALUES ($1, $2, $3)
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(new_link.original_url)
        .bind(new_link.short_code)
        .bind(new_link.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<u64, AppError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE links
            SET original_url = COALESCE($2, original_url),
                access_count = COALESCE($3, access_count),
                deleted_at   = COALESCE($4, deleted_at),
                updated_at   = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.original_url)
        .bind(patch.access_count)
        .bind(patch.deleted_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE short_code = $1
            ORDER BY (deleted_at IS NULL) DESC, id DESC
            LIMIT 1
            "#
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row: Option<LinkRow> =
            sqlx::query_as(&format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Link::from))
    }

    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
