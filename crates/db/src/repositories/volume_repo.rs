//! Repository for the `volumes` table.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;

use crate::models::volume::{CreateVolume, UpdateVolume, Volume, VolumeFilter};

const COLUMNS: &str = "id, series_id, number, title, description, cover_url, \
                       start_chapter, end_chapter, created_at, updated_at";

pub struct VolumeRepo;

impl VolumeRepo {
    pub async fn create(pool: &PgPool, input: &CreateVolume) -> Result<Volume, sqlx::Error> {
        let query = format!(
            "INSERT INTO volumes
                (series_id, number, title, description, cover_url, start_chapter, end_chapter)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Volume>(&query)
            .bind(input.series_id)
            .bind(input.number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.cover_url)
            .bind(input.start_chapter)
            .bind(input.end_chapter)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Volume>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM volumes WHERE id = $1");
        sqlx::query_as::<_, Volume>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List volumes in number order.
    pub async fn list(
        pool: &PgPool,
        filter: &VolumeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Volume>, i64), sqlx::Error> {
        let where_clause = "WHERE ($1::BIGINT IS NULL OR series_id = $1)";
        let query = format!(
            "SELECT {COLUMNS} FROM volumes {where_clause}
             ORDER BY number ASC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, Volume>(&query)
            .bind(filter.series_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM volumes {where_clause}"))
            .bind(filter.series_id)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVolume,
    ) -> Result<Option<Volume>, sqlx::Error> {
        let query = format!(
            "UPDATE volumes SET
                series_id = COALESCE($2, series_id),
                number = COALESCE($3, number),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                cover_url = COALESCE($6, cover_url),
                start_chapter = COALESCE($7, start_chapter),
                end_chapter = COALESCE($8, end_chapter)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Volume>(&query)
            .bind(id)
            .bind(input.series_id)
            .bind(input.number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.cover_url)
            .bind(input.start_chapter)
            .bind(input.end_chapter)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM volumes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
