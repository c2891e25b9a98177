//! Repository for `gambles`, `gamble_teams`, `gamble_team_members` and
//! `gamble_rounds`.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;

use crate::models::gamble::{
    CreateGamble, CreateGambleRound, CreateGambleTeam, Gamble, GambleFilter, GambleRound,
    GambleTeam, UpdateGamble, UpdateGambleRound, UpdateGambleTeam,
};

const COLUMNS: &str = "g.id, g.name, g.description, g.rules, g.win_condition, g.outcome, \
                       g.chapter_number, g.end_chapter, g.arc_id, g.created_at, g.updated_at";

const FILTER: &str = "WHERE ($1::BIGINT IS NULL OR g.arc_id = $1)
       AND ($2::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM gamble_teams t
            JOIN gamble_team_members m ON m.team_id = t.id
            WHERE t.gamble_id = g.id AND m.character_id = $2))";

const TEAM_COLUMNS: &str = "t.id, t.gamble_id, t.name, t.faction_id, t.is_winner, \
     ARRAY(SELECT m.character_id FROM gamble_team_members m \
           WHERE m.team_id = t.id ORDER BY m.character_id) AS member_ids, \
     t.created_at, t.updated_at";

const ROUND_COLUMNS: &str = "id, gamble_id, round_number, title, description, outcome, \
                             winner_team_id, created_at, updated_at";

pub struct GambleRepo;

impl GambleRepo {
    pub async fn create(pool: &PgPool, input: &CreateGamble) -> Result<Gamble, sqlx::Error> {
        let query = format!(
            "INSERT INTO gambles AS g
                (name, description, rules, win_condition, outcome, chapter_number, end_chapter, arc_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gamble>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(&input.rules)
            .bind(&input.win_condition)
            .bind(&input.outcome)
            .bind(input.chapter_number)
            .bind(input.end_chapter)
            .bind(input.arc_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Gamble>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gambles g WHERE g.id = $1");
        sqlx::query_as::<_, Gamble>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List gambles in the order they begin.
    pub async fn list(
        pool: &PgPool,
        filter: &GambleFilter,
        page: PageRequest,
    ) -> Result<(Vec<Gamble>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gambles g {FILTER}
             ORDER BY g.chapter_number ASC NULLS LAST, g.id ASC
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, Gamble>(&query)
            .bind(filter.arc_id)
            .bind(filter.character_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM gambles g {FILTER}"))
            .bind(filter.arc_id)
            .bind(filter.character_id)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGamble,
    ) -> Result<Option<Gamble>, sqlx::Error> {
        let query = format!(
            "UPDATE gambles AS g SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                rules = COALESCE($4, rules),
                win_condition = COALESCE($5, win_condition),
                outcome = COALESCE($6, outcome),
                chapter_number = COALESCE($7, chapter_number),
                end_chapter = COALESCE($8, end_chapter),
                arc_id = COALESCE($9, arc_id)
             WHERE g.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gamble>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.rules)
            .bind(&input.win_condition)
            .bind(&input.outcome)
            .bind(input.chapter_number)
            .bind(input.end_chapter)
            .bind(input.arc_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a gamble. Teams, members and rounds cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gambles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM gambles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    // ----- Teams -----

    pub async fn list_teams(pool: &PgPool, gamble_id: DbId) -> Result<Vec<GambleTeam>, sqlx::Error> {
        let query = format!(
            "SELECT {TEAM_COLUMNS} FROM gamble_teams t
             WHERE t.gamble_id = $1
             ORDER BY t.id ASC"
        );
        sqlx::query_as::<_, GambleTeam>(&query)
            .bind(gamble_id)
            .fetch_all(pool)
            .await
    }

    /// Find a team, scoped to its gamble so ids from other gambles miss.
    pub async fn find_team(
        pool: &PgPool,
        gamble_id: DbId,
        team_id: DbId,
    ) -> Result<Option<GambleTeam>, sqlx::Error> {
        let query = format!(
            "SELECT {TEAM_COLUMNS} FROM gamble_teams t
             WHERE t.gamble_id = $1 AND t.id = $2"
        );
        sqlx::query_as::<_, GambleTeam>(&query)
            .bind(gamble_id)
            .bind(team_id)
            .fetch_optional(pool)
            .await
    }

    /// Create a team and its roster in one transaction.
    pub async fn create_team(
        pool: &PgPool,
        gamble_id: DbId,
        input: &CreateGambleTeam,
    ) -> Result<GambleTeam, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let team_id: DbId = sqlx::query_scalar(
            "INSERT INTO gamble_teams (gamble_id, name, faction_id, is_winner)
             VALUES ($1, $2, $3, COALESCE($4, false))
             RETURNING id",
        )
        .bind(gamble_id)
        .bind(input.name.trim())
        .bind(input.faction_id)
        .bind(input.is_winner)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_members_inner(&mut tx, team_id, &input.member_ids).await?;
        tx.commit().await?;

        Self::find_team(pool, gamble_id, team_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Update a team. A present `member_ids` replaces the roster.
    pub async fn update_team(
        pool: &PgPool,
        gamble_id: DbId,
        team_id: DbId,
        input: &UpdateGambleTeam,
    ) -> Result<Option<GambleTeam>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE gamble_teams SET
                name = COALESCE($3, name),
                faction_id = COALESCE($4, faction_id),
                is_winner = COALESCE($5, is_winner)
             WHERE gamble_id = $1 AND id = $2
             RETURNING id",
        )
        .bind(gamble_id)
        .bind(team_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.faction_id)
        .bind(input.is_winner)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }
        if let Some(member_ids) = &input.member_ids {
            Self::set_members_inner(&mut tx, team_id, member_ids).await?;
        }
        tx.commit().await?;

        Self::find_team(pool, gamble_id, team_id).await
    }

    pub async fn delete_team(
        pool: &PgPool,
        gamble_id: DbId,
        team_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gamble_teams WHERE gamble_id = $1 AND id = $2")
            .bind(gamble_id)
            .bind(team_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_members_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        team_id: DbId,
        character_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM gamble_team_members WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut **tx)
            .await?;

        for &character_id in character_ids {
            sqlx::query(
                "INSERT INTO gamble_team_members (team_id, character_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(team_id)
            .bind(character_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    // ----- Rounds -----

    pub async fn list_rounds(
        pool: &PgPool,
        gamble_id: DbId,
    ) -> Result<Vec<GambleRound>, sqlx::Error> {
        let query = format!(
            "SELECT {ROUND_COLUMNS} FROM gamble_rounds
             WHERE gamble_id = $1
             ORDER BY round_number ASC"
        );
        sqlx::query_as::<_, GambleRound>(&query)
            .bind(gamble_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create_round(
        pool: &PgPool,
        gamble_id: DbId,
        input: &CreateGambleRound,
    ) -> Result<GambleRound, sqlx::Error> {
        let query = format!(
            "INSERT INTO gamble_rounds
                (gamble_id, round_number, title, description, outcome, winner_team_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ROUND_COLUMNS}"
        );
        sqlx::query_as::<_, GambleRound>(&query)
            .bind(gamble_id)
            .bind(input.round_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.outcome)
            .bind(input.winner_team_id)
            .fetch_one(pool)
            .await
    }

    pub async fn update_round(
        pool: &PgPool,
        gamble_id: DbId,
        round_id: DbId,
        input: &UpdateGambleRound,
    ) -> Result<Option<GambleRound>, sqlx::Error> {
        let query = format!(
            "UPDATE gamble_rounds SET
                round_number = COALESCE($3, round_number),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                outcome = COALESCE($6, outcome),
                winner_team_id = COALESCE($7, winner_team_id)
             WHERE gamble_id = $1 AND id = $2
             RETURNING {ROUND_COLUMNS}"
        );
        sqlx::query_as::<_, GambleRound>(&query)
            .bind(gamble_id)
            .bind(round_id)
            .bind(input.round_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.outcome)
            .bind(input.winner_team_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_round(
        pool: &PgPool,
        gamble_id: DbId,
        round_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gamble_rounds WHERE gamble_id = $1 AND id = $2")
            .bind(gamble_id)
            .bind(round_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
