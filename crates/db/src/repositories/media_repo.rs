//! Repository for the `media` table.

use sqlx::PgPool;
use usogui_core::media::{MediaOwnerType, MediaStatus};
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;

use crate::models::media::{CreateMedia, Media, MediaFilter};

const COLUMNS: &str = "id, url, media_type, status, purpose, owner_type, owner_id, chapter_number, \
                       title, description, thumbnail_url, platform, submitted_by, \
                       rejection_reason, reviewed_by, reviewed_at, created_at, updated_at";

const FILTER: &str = "WHERE ($1::TEXT IS NULL OR owner_type = $1)
       AND ($2::BIGINT IS NULL OR owner_id = $2)
       AND ($3::TEXT IS NULL OR media_type = $3)
       AND ($4::TEXT IS NULL OR purpose = $4)
       AND ($5::TEXT IS NULL OR status = $5)";

pub struct MediaRepo;

impl MediaRepo {
    pub async fn create(pool: &PgPool, input: &CreateMedia) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media
                (url, media_type, status, purpose, owner_type, owner_id, chapter_number,
                 title, description, thumbnail_url, platform, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(&input.url)
            .bind(&input.media_type)
            .bind(&input.status)
            .bind(&input.purpose)
            .bind(&input.owner_type)
            .bind(input.owner_id)
            .bind(input.chapter_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(&input.platform)
            .bind(input.submitted_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List media, oldest submissions first.
    pub async fn list(
        pool: &PgPool,
        filter: &MediaFilter,
        page: PageRequest,
    ) -> Result<(Vec<Media>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media {FILTER}
             ORDER BY created_at ASC, id ASC
             LIMIT $6 OFFSET $7"
        );
        let rows = sqlx::query_as::<_, Media>(&query)
            .bind(&filter.owner_type)
            .bind(filter.owner_id)
            .bind(&filter.media_type)
            .bind(&filter.purpose)
            .bind(&filter.status)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM media {FILTER}"))
            .bind(&filter.owner_type)
            .bind(filter.owner_id)
            .bind(&filter.media_type)
            .bind(&filter.purpose)
            .bind(&filter.status)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    /// Whether the owner a submission points at exists.
    pub async fn owner_exists(
        pool: &PgPool,
        owner_type: MediaOwnerType,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)",
            owner_type.table()
        );
        sqlx::query_scalar(&query)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Record a moderation decision on a pending item.
    ///
    /// Conditioned on `status = 'pending'`; returns `None` when the item was
    /// already reviewed (or does not exist).
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        decision: MediaStatus,
        reviewer_id: DbId,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Media>, sqlx::Error> {
        let query = format!(
            "UPDATE media SET
                status = $2,
                reviewed_by = $3,
                reviewed_at = NOW(),
                rejection_reason = $4
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(decision.as_str())
            .bind(reviewer_id)
            .bind(rejection_reason)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
