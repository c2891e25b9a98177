//! Repository for the `<entity>_translations` tables.
//!
//! Table and column names come from [`TranslatableEntity`], a closed enum of
//! static strings, so interpolating them into SQL is safe.

use std::collections::HashMap;

use sqlx::PgPool;
use usogui_core::language::{Language, TranslatableEntity, TranslatedText};
use usogui_core::types::DbId;

use crate::models::translation::{Translation, UpsertTranslation};

fn columns(entity: TranslatableEntity) -> String {
    format!(
        "id, {} AS entity_id, language, name, description, created_at, updated_at",
        entity.foreign_key()
    )
}

pub struct TranslationRepo;

impl TranslationRepo {
    /// Whether the base row being translated exists.
    pub async fn entity_exists(
        pool: &PgPool,
        entity: TranslatableEntity,
        entity_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)",
            entity.base_table()
        );
        sqlx::query_scalar(&query)
            .bind(entity_id)
            .fetch_one(pool)
            .await
    }

    /// All translations of one entity, by language code.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity: TranslatableEntity,
        entity_id: DbId,
    ) -> Result<Vec<Translation>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY language ASC",
            columns(entity),
            entity.translation_table(),
            entity.foreign_key()
        );
        sqlx::query_as::<_, Translation>(&query)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        entity: TranslatableEntity,
        entity_id: DbId,
        language: Language,
    ) -> Result<Option<Translation>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 AND language = $2",
            columns(entity),
            entity.translation_table(),
            entity.foreign_key()
        );
        sqlx::query_as::<_, Translation>(&query)
            .bind(entity_id)
            .bind(language.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the translation for `(entity_id, language)`.
    pub async fn upsert(
        pool: &PgPool,
        entity: TranslatableEntity,
        entity_id: DbId,
        language: Language,
        input: &UpsertTranslation,
    ) -> Result<Translation, sqlx::Error> {
        let fk = entity.foreign_key();
        let query = format!(
            "INSERT INTO {table} ({fk}, language, name, description)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ({fk}, language) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description
             RETURNING {columns}",
            table = entity.translation_table(),
            columns = columns(entity),
        );
        sqlx::query_as::<_, Translation>(&query)
            .bind(entity_id)
            .bind(language.as_str())
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(
        pool: &PgPool,
        entity: TranslatableEntity,
        entity_id: DbId,
        language: Language,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE {} = $1 AND language = $2",
            entity.translation_table(),
            entity.foreign_key()
        );
        let result = sqlx::query(&query)
            .bind(entity_id)
            .bind(language.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load translations for a batch of entities in one query, keyed by
    /// entity id. English is the base row, so it always yields an empty map.
    pub async fn overlay_map(
        pool: &PgPool,
        entity: TranslatableEntity,
        language: Language,
        entity_ids: &[DbId],
    ) -> Result<HashMap<DbId, TranslatedText>, sqlx::Error> {
        if language.is_canonical() || entity_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = format!(
            "SELECT {} FROM {} WHERE {} = ANY($1) AND language = $2",
            columns(entity),
            entity.translation_table(),
            entity.foreign_key()
        );
        let rows = sqlx::query_as::<_, Translation>(&query)
            .bind(entity_ids)
            .bind(language.as_str())
            .fetch_all(pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|t| (t.entity_id, TranslatedText::from(t)))
            .collect())
    }
}
