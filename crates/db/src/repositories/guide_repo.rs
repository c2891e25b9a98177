//! Repository for `guides`, `guide_characters` and `guide_likes`.

use sqlx::PgPool;
use usogui_core::guide::GuideStatus;
use usogui_core::pagination::PageRequest;
use usogui_core::types::DbId;
use usogui_core::validation::like_pattern;

use crate::models::guide::{CreateGuide, Guide, GuideFilter, LikeState, UpdateGuide};

const COLUMNS: &str = "g.id, g.title, g.description, g.content, g.status, g.author_id, \
     u.username AS author_username, g.arc_id, g.gamble_id, g.view_count, g.like_count, \
     g.rejection_reason, g.published_at, \
     ARRAY(SELECT gc.character_id FROM guide_characters gc \
           WHERE gc.guide_id = g.id ORDER BY gc.character_id) AS character_ids, \
     g.created_at, g.updated_at";

const FROM: &str = "FROM guides g JOIN users u ON u.id = g.author_id";

const FILTER: &str = "WHERE ($1::TEXT IS NULL OR g.title ILIKE $1 OR g.description ILIKE $1)
       AND ($2::BIGINT IS NULL OR g.author_id = $2)
       AND ($3::BIGINT IS NULL OR EXISTS (
            SELECT 1 FROM guide_characters gc
            WHERE gc.guide_id = g.id AND gc.character_id = $3))
       AND ($4::BIGINT IS NULL OR g.arc_id = $4)
       AND ($5::TEXT IS NULL OR g.status = $5)";

pub struct GuideRepo;

impl GuideRepo {
    /// Insert a new draft guide with its linked characters.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreateGuide,
    ) -> Result<Guide, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO guides (title, description, content, status, author_id, arc_id, gamble_id)
             VALUES ($1, $2, $3, 'draft', $4, $5, $6)
             RETURNING id",
        )
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(&input.content)
        .bind(author_id)
        .bind(input.arc_id)
        .bind(input.gamble_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_characters_inner(&mut tx, id, &input.character_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Guide>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {FROM} WHERE g.id = $1");
        sqlx::query_as::<_, Guide>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &GuideFilter,
        page: PageRequest,
    ) -> Result<(Vec<Guide>, i64), sqlx::Error> {
        let pattern = filter.search.as_deref().map(like_pattern);
        let status = filter.status.map(|s| s.as_str());
        let query = format!(
            "SELECT {COLUMNS} {FROM} {FILTER}
             ORDER BY {}
             LIMIT $6 OFFSET $7",
            filter.sort.order_by()
        );
        let rows = sqlx::query_as::<_, Guide>(&query)
            .bind(&pattern)
            .bind(filter.author_id)
            .bind(filter.character_id)
            .bind(filter.arc_id)
            .bind(status)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {FROM} {FILTER}"))
            .bind(&pattern)
            .bind(filter.author_id)
            .bind(filter.character_id)
            .bind(filter.arc_id)
            .bind(status)
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    /// Update a guide's content. A present `character_ids` replaces the links.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGuide,
    ) -> Result<Option<Guide>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE guides SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                content = COALESCE($4, content),
                arc_id = COALESCE($5, arc_id),
                gamble_id = COALESCE($6, gamble_id)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(input.title.as_deref().map(str::trim))
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.arc_id)
        .bind(input.gamble_id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }
        if let Some(character_ids) = &input.character_ids {
            Self::set_characters_inner(&mut tx, id, character_ids).await?;
        }
        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Move a guide from `from` to `to`.
    ///
    /// The update is conditioned on the current status, so two moderators
    /// acting at once cannot both succeed; the loser gets `None`.
    /// `published_at` is stamped on publication and the rejection reason is
    /// kept only while the guide is rejected.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: GuideStatus,
        to: GuideStatus,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Guide>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE guides SET
                status = $3,
                rejection_reason = CASE WHEN $3 = 'rejected' THEN $4 ELSE NULL END,
                published_at = CASE WHEN $3 = 'published' THEN NOW() ELSE published_at END
             WHERE id = $1 AND status = $2
             RETURNING id",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(rejection_reason)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM guides WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE guides SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Like the guide if the user has not, otherwise remove the like.
    /// The counter moves in the same transaction as the like row.
    pub async fn toggle_like(
        pool: &PgPool,
        guide_id: DbId,
        user_id: DbId,
    ) -> Result<LikeState, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM guide_likes WHERE guide_id = $1 AND user_id = $2")
            .bind(guide_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        let like_count: i64 = if removed {
            sqlx::query_scalar(
                "UPDATE guides SET like_count = GREATEST(like_count - 1, 0)
                 WHERE id = $1
                 RETURNING like_count",
            )
            .bind(guide_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query("INSERT INTO guide_likes (guide_id, user_id) VALUES ($1, $2)")
                .bind(guide_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query_scalar(
                "UPDATE guides SET like_count = like_count + 1
                 WHERE id = $1
                 RETURNING like_count",
            )
            .bind(guide_id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(LikeState {
            liked: !removed,
            like_count,
        })
    }

    async fn set_characters_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        guide_id: DbId,
        character_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM guide_characters WHERE guide_id = $1")
            .bind(guide_id)
            .execute(&mut **tx)
            .await?;

        for &character_id in character_ids {
            sqlx::query(
                "INSERT INTO guide_characters (guide_id, character_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(guide_id)
            .bind(character_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
