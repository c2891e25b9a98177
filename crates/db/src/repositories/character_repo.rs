//! Repository for the `characters` table and faction memberships.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;
use usogui_core::validation::like_pattern;

use crate::models::character::{
    Character, CharacterFactionLink, CharacterFilter, CreateCharacter, FactionMembershipInput,
    UpdateCharacter,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "c.id, c.name, c.alternate_names, c.description, c.backstory, \
                       c.first_appearance_chapter, c.created_at, c.updated_at";

/// `$1` search pattern, `$2` faction, `$3` arc (via gambles or events),
/// `$4` reader progress. Names always match; alternate names only once the
/// character has been introduced.
const FILTER: &str = "WHERE ($1::TEXT IS NULL
            OR c.name ILIKE $1
            OR (($4::INT IS NULL
                    OR c.first_appearance_chapter IS NULL
                    OR c.first_appearance_chapter <= $4)
                AND EXISTS (SELECT 1 FROM unnest(c.alternate_names) alt WHERE alt ILIKE $1)))
       AND ($2::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM character_factions cf
            WHERE cf.character_id = c.id AND cf.faction_id = $2))
       AND ($3::BIGINT IS NULL
            OR EXISTS (
                SELECT 1 FROM gamble_team_members m
                JOIN gamble_teams t ON t.id = m.team_id
                JOIN gambles g ON g.id = t.gamble_id
                WHERE m.character_id = c.id AND g.arc_id = $3)
            OR EXISTS (
                SELECT 1 FROM event_characters ec
                JOIN events e ON e.id = ec.event_id
                WHERE ec.character_id = c.id AND e.arc_id = $3))";

/// Provides CRUD operations for characters plus faction membership helpers.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCharacter) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters AS c
                (name, alternate_names, description, backstory, first_appearance_chapter)
             VALUES ($1, COALESCE($2, '{{}}'::TEXT[]), $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(input.name.trim())
            .bind(&input.alternate_names)
            .bind(&input.description)
            .bind(&input.backstory)
            .bind(input.first_appearance_chapter)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters c WHERE c.id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List characters alphabetically with optional filters.
    pub async fn list(
        pool: &PgPool,
        filter: &CharacterFilter,
        page: PageRequest,
    ) -> Result<(Vec<Character>, i64), sqlx::Error> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let query = format!(
            "SELECT {COLUMNS} FROM characters c {FILTER}
             ORDER BY c.name ASC
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, Character>(&query)
            .bind(&pattern)
            .bind(filter.faction_id)
            .bind(filter.arc_id)
            .bind(filter.max_chapter)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM characters c {FILTER}"))
                .bind(&pattern)
                .bind(filter.faction_id)
                .bind(filter.arc_id)
                .bind(filter.max_chapter)
                .fetch_one(pool)
                .await?;
        Ok((rows, total))
    }

    /// Update a character. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters AS c SET
                name = COALESCE($2, name),
                alternate_names = COALESCE($3, alternate_names),
                description = COALESCE($4, description),
                backstory = COALESCE($5, backstory),
                first_appearance_chapter = COALESCE($6, first_appearance_chapter)
             WHERE c.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.alternate_names)
            .bind(&input.description)
            .bind(&input.backstory)
            .bind(input.first_appearance_chapter)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a character. Memberships, quotes and links cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM characters WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    // ----- Faction memberships -----

    pub async fn list_factions(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<CharacterFactionLink>, sqlx::Error> {
        sqlx::query_as::<_, CharacterFactionLink>(
            "SELECT cf.faction_id, f.name AS faction_name, cf.role
             FROM character_factions cf
             JOIN factions f ON f.id = cf.faction_id
             WHERE cf.character_id = $1
             ORDER BY f.name ASC",
        )
        .bind(character_id)
        .fetch_all(pool)
        .await
    }

    /// Replace every faction membership of a character in one transaction.
    pub async fn set_factions(
        pool: &PgPool,
        character_id: DbId,
        memberships: &[FactionMembershipInput],
    ) -> Result<Vec<CharacterFactionLink>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM character_factions WHERE character_id = $1")
            .bind(character_id)
            .execute(&mut *tx)
            .await?;

        for membership in memberships {
            sqlx::query(
                "INSERT INTO character_factions (character_id, faction_id, role)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (character_id, faction_id) DO UPDATE SET role = EXCLUDED.role",
            )
            .bind(character_id)
            .bind(membership.faction_id)
            .bind(&membership.role)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Self::list_factions(pool, character_id).await
    }
}
