//! Repository for `tags` and the polymorphic `entity_tags` join table.

use sqlx::PgPool;
use usogui_core::pagination::PageRequest;
use usogui_core::tag::TaggableEntity;
use usogui_core::types::DbId;

use crate::models::tag::Tag;

const COLUMNS: &str = "t.id, t.name, t.description, t.created_at, t.updated_at";

pub struct TagRepo;

impl TagRepo {
    /// Insert a tag. `name` must already be normalized.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
    ) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags AS t (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags t WHERE t.id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, page: PageRequest) -> Result<(Vec<Tag>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags t
             ORDER BY t.name ASC
             LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, Tag>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(pool)
            .await?;
        Ok((rows, total))
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags AS t SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(name)
            .bind(description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ----- Entity tagging -----

    pub async fn entity_exists(
        pool: &PgPool,
        entity: TaggableEntity,
        entity_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", entity.table());
        sqlx::query_scalar(&query)
            .bind(entity_id)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_entity(
        pool: &PgPool,
        entity: TaggableEntity,
        entity_id: DbId,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags t
             JOIN entity_tags et ON et.tag_id = t.id
             WHERE et.entity_type = $1 AND et.entity_id = $2
             ORDER BY t.name ASC"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(entity.as_str())
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every tag on an entity in one transaction.
    pub async fn set_for_entity(
        pool: &PgPool,
        entity: TaggableEntity,
        entity_id: DbId,
        tag_ids: &[DbId],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM entity_tags WHERE entity_type = $1 AND entity_id = $2")
            .bind(entity.as_str())
            .bind(entity_id)
            .execute(&mut *tx)
            .await?;

        for &tag_id in tag_ids {
            sqlx::query(
                "INSERT INTO entity_tags (entity_type, entity_id, tag_id) VALUES ($1, $2, $3)
                 ON CONFLICT DO NOTHING",
            )
            .bind(entity.as_str())
            .bind(entity_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Self::list_for_entity(pool, entity, entity_id).await
    }
}
