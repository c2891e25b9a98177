//! Repository for the `events` and `event_characters` tables.

use sqlx::PgPool;
use usogui_core::event::{EventStatus, EventType};
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;

use crate::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};

const COLUMNS: &str = "e.id, e.title, e.description, e.event_type, e.status, e.chapter_number, \
     e.spoiler_chapter, e.arc_id, e.gamble_id, e.created_by, \
     ARRAY(SELECT ec.character_id FROM event_characters ec \
           WHERE ec.event_id = e.id ORDER BY ec.character_id) AS character_ids, \
     e.created_at, e.updated_at";

const FILTER: &str = "WHERE ($1::BIGINT IS NULL OR e.arc_id = $1)
       AND ($2::BIGINT IS NULL OR e.gamble_id = $2)
       AND ($3::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM event_characters ec
            WHERE ec.event_id = e.id AND ec.character_id = $3))
       AND ($4::TEXT IS NULL OR e.event_type = $4)
       AND ($5::TEXT IS NULL OR e.status = $5)";

pub struct EventRepo;

impl EventRepo {
    /// Insert an event with its characters in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEvent,
        event_type: EventType,
        status: EventStatus,
        created_by: DbId,
    ) -> Result<Event, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO events
                (title, description, event_type, status, chapter_number, spoiler_chapter,
                 arc_id, gamble_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(event_type.as_str())
        .bind(status.as_str())
        .bind(input.chapter_number)
        .bind(input.spoiler_chapter)
        .bind(input.arc_id)
        .bind(input.gamble_id)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_characters_inner(&mut tx, id, &input.character_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events e WHERE e.id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events in chapter order.
    pub async fn list(
        pool: &PgPool,
        filter: &EventFilter,
        page: PageRequest,
    ) -> Result<(Vec<Event>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events e {FILTER}
             ORDER BY e.chapter_number ASC, e.id ASC
             LIMIT $6 OFFSET $7"
        );
        let rows = sqlx::query_as::<_, Event>(&query)
            .bind(filter.arc_id)
            .bind(filter.gamble_id)
            .bind(filter.character_id)
            .bind(&filter.event_type)
            .bind(&filter.status)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM events e {FILTER}"))
            .bind(filter.arc_id)
            .bind(filter.gamble_id)
            .bind(filter.character_id)
            .bind(&filter.event_type)
            .bind(&filter.status)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
        event_type: Option<EventType>,
    ) -> Result<Option<Event>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_type = COALESCE($4, event_type),
                chapter_number = COALESCE($5, chapter_number),
                spoiler_chapter = COALESCE($6, spoiler_chapter),
                arc_id = COALESCE($7, arc_id),
                gamble_id = COALESCE($8, gamble_id)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(input.title.as_deref().map(str::trim))
        .bind(&input.description)
        .bind(event_type.map(|t| t.as_str()))
        .bind(input.chapter_number)
        .bind(input.spoiler_chapter)
        .bind(input.arc_id)
        .bind(input.gamble_id)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Mark an event approved. Returns `false` if it does not exist or was
    /// already approved.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE events SET status = 'approved' WHERE id = $1 AND status <> 'approved'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the characters involved in an event.
    pub async fn set_characters(
        pool: &PgPool,
        id: DbId,
        character_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::set_characters_inner(&mut tx, id, character_ids).await?;
        tx.commit().await
    }

    async fn set_characters_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        event_id: DbId,
        character_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM event_characters WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut **tx)
            .await?;

        for &character_id in character_ids {
            sqlx::query(
                "INSERT INTO event_characters (event_id, character_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(event_id)
            .bind(character_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
