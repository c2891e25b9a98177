//! Translation rows for every translatable entity.
//!
//! All `<entity>_translations` tables share one shape; the entity's foreign
//! key column is aliased to `entity_id` when read.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::TranslatedText;
use usogui_core::types::{DbId, Timestamp};
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Translation {
    pub id: DbId,
    pub entity_id: DbId,
    pub language: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Translation> for TranslatedText {
    fn from(t: Translation) -> Self {
        Self {
            name: t.name,
            description: t.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertTranslation {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 100000))]
    pub description: Option<String>,
}
