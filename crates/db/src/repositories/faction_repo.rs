//! Repository for the `factions` table.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;

use crate::models::faction::{CreateFaction, Faction, FactionMember, UpdateFaction};

const COLUMNS: &str = "id, name, description, created_at, updated_at";

pub struct FactionRepo;

impl FactionRepo {
    pub async fn create(pool: &PgPool, input: &CreateFaction) -> Result<Faction, sqlx::Error> {
        let query = format!(
            "INSERT INTO factions (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Faction>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Faction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM factions WHERE id = $1");
        sqlx::query_as::<_, Faction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, page: PageRequest) -> Result<(Vec<Faction>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM factions
             ORDER BY name ASC
             LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, Faction>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM factions")
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFaction,
    ) -> Result<Option<Faction>, sqlx::Error> {
        let query = format!(
            "UPDATE factions SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Faction>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM factions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Members of a faction, in order of first appearance.
    pub async fn list_members(
        pool: &PgPool,
        faction_id: DbId,
    ) -> Result<Vec<FactionMember>, sqlx::Error> {
        sqlx::query_as::<_, FactionMember>(
            "SELECT c.id AS character_id, c.name, cf.role, c.first_appearance_chapter
             FROM character_factions cf
             JOIN characters c ON c.id = cf.character_id
             WHERE cf.faction_id = $1
             ORDER BY c.first_appearance_chapter ASC NULLS LAST, c.name ASC",
        )
        .bind(faction_id)
        .fetch_all(pool)
        .await
    }
}
