//! Repository for the `quotes` table.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::types::{ChapterNumber, DbId};
use usogui_core::validation::like_pattern;

use crate::models::quote::{CreateQuote, Quote, QuoteFilter, UpdateQuote};

const COLUMNS: &str = "q.id, q.text, q.character_id, c.name AS character_name, q.chapter_number, \
                       q.page_number, q.context, q.submitted_by, q.created_at, q.updated_at";

const FROM: &str = "FROM quotes q JOIN characters c ON c.id = q.character_id";

/// `$1` character, `$2` text pattern, `$3` reader progress. Text of quotes
/// past the reader's progress never matches.
const FILTER: &str = "WHERE ($1::BIGINT IS NULL OR q.character_id = $1)
       AND ($2::TEXT IS NULL
            OR (q.text ILIKE $2 AND ($3::INT IS NULL OR q.chapter_number <= $3)))";

pub struct QuoteRepo;

impl QuoteRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateQuote,
        submitted_by: DbId,
    ) -> Result<Quote, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO quotes (text, character_id, chapter_number, page_number, context, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.text.trim())
        .bind(input.character_id)
        .bind(input.chapter_number)
        .bind(input.page_number)
        .bind(&input.context)
        .bind(submitted_by)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE q.id = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List quotes in chapter order.
    pub async fn list(
        pool: &PgPool,
        filter: &QuoteFilter,
        page: PageRequest,
    ) -> Result<(Vec<Quote>, i64), sqlx::Error> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let query = format!(
            "SELECT {COLUMNS} {FROM} {FILTER}
             ORDER BY q.chapter_number ASC, q.page_number ASC NULLS LAST, q.id ASC
             LIMIT $4 OFFSET $5"
        );
        let rows = sqlx::query_as::<_, Quote>(&query)
            .bind(filter.character_id)
            .bind(&pattern)
            .bind(filter.max_chapter)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {FROM} {FILTER}"))
            .bind(filter.character_id)
            .bind(&pattern)
            .bind(filter.max_chapter)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    /// Pick a random quote, restricted to chapters up to `max_chapter` when given.
    pub async fn random(
        pool: &PgPool,
        max_chapter: Option<ChapterNumber>,
    ) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {FROM}
             WHERE ($1::INT IS NULL OR q.chapter_number <= $1)
             ORDER BY random()
             LIMIT 1"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(max_chapter)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuote,
    ) -> Result<Option<Quote>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE quotes SET
                text = COALESCE($2, text),
                character_id = COALESCE($3, character_id),
                chapter_number = COALESCE($4, chapter_number),
                page_number = COALESCE($5, page_number),
                context = COALESCE($6, context)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(input.text.as_deref().map(str::trim))
        .bind(input.character_id)
        .bind(input.chapter_number)
        .bind(input.page_number)
        .bind(&input.context)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
