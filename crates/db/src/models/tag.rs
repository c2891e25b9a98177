//! Tag model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::types::{DbId, Timestamp};
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Names are normalized with `normalize_tag_name` before insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTag {
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTag {
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Full replacement of the tags on one entity.
#[derive(Debug, Clone, Deserialize)]
pub struct SetEntityTags {
    pub tag_ids: Vec<DbId>,
}
