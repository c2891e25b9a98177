//! Case-insensitive substring search across the main entity tables.
//!
//! Names always match. Narrative columns (alternate names, descriptions)
//! only match on rows the reader has reached, given as `max_chapter`.

use sqlx::PgPool;
use usogui_core::types::ChapterNumber;
use usogui_core::validation::like_pattern;

use crate::models::search::SearchHit;

pub struct SearchRepo;

impl SearchRepo {
    pub async fn characters(
        pool: &PgPool,
        q: &str,
        limit: i64,
        max_chapter: Option<ChapterNumber>,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        Self::gated_hits(
            pool,
            "SELECT id, name, description AS snippet, first_appearance_chapter AS chapter
             FROM characters
             WHERE name ILIKE $1
                OR (($3::INT IS NULL
                        OR first_appearance_chapter IS NULL
                        OR first_appearance_chapter <= $3)
                    AND EXISTS (SELECT 1 FROM unnest(alternate_names) alt WHERE alt ILIKE $1))
             ORDER BY name ASC
             LIMIT $2",
            q,
            limit,
            max_chapter,
        )
        .await
    }

    pub async fn arcs(
        pool: &PgPool,
        q: &str,
        limit: i64,
        max_chapter: Option<ChapterNumber>,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        Self::gated_hits(
            pool,
            "SELECT id, name, description AS snippet, start_chapter AS chapter
             FROM arcs
             WHERE name ILIKE $1
                OR (description ILIKE $1
                    AND ($3::INT IS NULL OR start_chapter IS NULL OR start_chapter <= $3))
             ORDER BY sort_order ASC, id ASC
             LIMIT $2",
            q,
            limit,
            max_chapter,
        )
        .await
    }

    pub async fn gambles(
        pool: &PgPool,
        q: &str,
        limit: i64,
        max_chapter: Option<ChapterNumber>,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        Self::gated_hits(
            pool,
            "SELECT id, name, description AS snippet, chapter_number AS chapter
             FROM gambles
             WHERE name ILIKE $1
                OR (description ILIKE $1
                    AND ($3::INT IS NULL OR chapter_number IS NULL OR chapter_number <= $3))
             ORDER BY chapter_number ASC NULLS LAST, id ASC
             LIMIT $2",
            q,
            limit,
            max_chapter,
        )
        .await
    }

    pub async fn factions(
        pool: &PgPool,
        q: &str,
        limit: i64,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        Self::hits(
            pool,
            "SELECT id, name, description AS snippet, NULL::INT AS chapter
             FROM factions
             WHERE name ILIKE $1 OR description ILIKE $1
             ORDER BY name ASC
             LIMIT $2",
            q,
            limit,
        )
        .await
    }

    /// Only published guides are searchable.
    pub async fn guides(pool: &PgPool, q: &str, limit: i64) -> Result<Vec<SearchHit>, sqlx::Error> {
        Self::hits(
            pool,
            "SELECT id, title AS name, description AS snippet, NULL::INT AS chapter
             FROM guides
             WHERE status = 'published' AND (title ILIKE $1 OR description ILIKE $1)
             ORDER BY like_count DESC, id DESC
             LIMIT $2",
            q,
            limit,
        )
        .await
    }

    async fn hits(
        pool: &PgPool,
        sql: &str,
        q: &str,
        limit: i64,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        sqlx::query_as::<_, SearchHit>(sql)
            .bind(like_pattern(q))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Like [`hits`](Self::hits), with reader progress bound as `$3`.
    async fn gated_hits(
        pool: &PgPool,
        sql: &str,
        q: &str,
        limit: i64,
        max_chapter: Option<ChapterNumber>,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        sqlx::query_as::<_, SearchHit>(sql)
            .bind(like_pattern(q))
            .bind(limit)
            .bind(max_chapter)
            .fetch_all(pool)
            .await
    }
}
