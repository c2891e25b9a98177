//! Repository for the `chapters` table.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;

use crate::models::chapter::{Chapter, ChapterFilter, CreateChapter, UpdateChapter};

const COLUMNS: &str = "c.id, c.number, c.title, c.summary, c.volume_id, c.created_at, c.updated_at";

/// Arc membership is by chapter range, not by a foreign key.
const FILTER: &str = "WHERE ($1::BIGINT IS NULL OR c.volume_id = $1)
       AND ($2::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM arcs a
            WHERE a.id = $2
              AND a.start_chapter IS NOT NULL
              AND c.number >= a.start_chapter
              AND (a.end_chapter IS NULL OR c.number <= a.end_chapter)))";

pub struct ChapterRepo;

impl ChapterRepo {
    pub async fn create(pool: &PgPool, input: &CreateChapter) -> Result<Chapter, sqlx::Error> {
        let query = format!(
            "INSERT INTO chapters AS c (number, title, summary, volume_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(input.number)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(input.volume_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters c WHERE c.id = $1");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List chapters in reading order.
    pub async fn list(
        pool: &PgPool,
        filter: &ChapterFilter,
        page: PageRequest,
    ) -> Result<(Vec<Chapter>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chapters c {FILTER}
             ORDER BY c.number ASC
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, Chapter>(&query)
            .bind(filter.volume_id)
            .bind(filter.arc_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM chapters c {FILTER}"))
            .bind(filter.volume_id)
            .bind(filter.arc_id)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChapter,
    ) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!(
            "UPDATE chapters AS c SET
                number = COALESCE($2, number),
                title = COALESCE($3, title),
                summary = COALESCE($4, summary),
                volume_id = COALESCE($5, volume_id)
             WHERE c.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .bind(input.number)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(input.volume_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
