//! Repository for the `arcs` table.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;

use crate::models::arc::{ArcFilter, CreateArc, StoryArc, UpdateArc};

const COLUMNS: &str = "id, series_id, parent_id, name, description, sort_order, \
                       start_chapter, end_chapter, created_at, updated_at";

pub struct ArcRepo;

impl ArcRepo {
    pub async fn create(pool: &PgPool, input: &CreateArc) -> Result<StoryArc, sqlx::Error> {
        let query = format!(
            "INSERT INTO arcs
                (series_id, parent_id, name, description, sort_order, start_chapter, end_chapter)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoryArc>(&query)
            .bind(input.series_id)
            .bind(input.parent_id)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.sort_order)
            .bind(input.start_chapter)
            .bind(input.end_chapter)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StoryArc>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM arcs WHERE id = $1");
        sqlx::query_as::<_, StoryArc>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List arcs in story order.
    pub async fn list(
        pool: &PgPool,
        filter: &ArcFilter,
        page: PageRequest,
    ) -> Result<(Vec<StoryArc>, i64), sqlx::Error> {
        let where_clause = "WHERE ($1::BIGINT IS NULL OR parent_id = $1)
                             AND ($2::BIGINT IS NULL OR series_id = $2)";
        let query = format!(
            "SELECT {COLUMNS} FROM arcs {where_clause}
             ORDER BY sort_order ASC, start_chapter ASC NULLS LAST, id ASC
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, StoryArc>(&query)
            .bind(filter.parent_id)
            .bind(filter.series_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM arcs {where_clause}"))
            .bind(filter.parent_id)
            .bind(filter.series_id)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    /// Whether making `parent_id` the parent of `id` would close a cycle.
    pub async fn would_create_cycle(
        pool: &PgPool,
        id: DbId,
        parent_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "WITH RECURSIVE ancestors(id, parent_id) AS (
                SELECT id, parent_id FROM arcs WHERE id = $2
                UNION
                SELECT a.id, a.parent_id FROM arcs a
                JOIN ancestors anc ON a.id = anc.parent_id
             )
             SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $1)",
        )
        .bind(id)
        .bind(parent_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArc,
    ) -> Result<Option<StoryArc>, sqlx::Error> {
        let query = format!(
            "UPDATE arcs SET
                series_id = COALESCE($2, series_id),
                parent_id = COALESCE($3, parent_id),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                sort_order = COALESCE($6, sort_order),
                start_chapter = COALESCE($7, start_chapter),
                end_chapter = COALESCE($8, end_chapter)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoryArc>(&query)
            .bind(id)
            .bind(input.series_id)
            .bind(input.parent_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.sort_order)
            .bind(input.start_chapter)
            .bind(input.end_chapter)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM arcs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
