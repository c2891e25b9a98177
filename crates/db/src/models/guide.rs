//! Community guide model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::error::CoreError;
use usogui_core::guide::GuideStatus;
use usogui_core::types::{DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

/// A guide joined with its author's username. `character_ids` is aggregated
/// from `guide_characters`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Guide {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub status: String,
    pub author_id: DbId,
    pub author_username: String,
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
    pub view_count: i64,
    pub like_count: i64,
    pub rejection_reason: Option<String>,
    pub published_at: Option<Timestamp>,
    pub character_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Guide {
    pub fn status(&self) -> Result<GuideStatus, CoreError> {
        GuideStatus::from_str_db(&self.status)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGuide {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 100000), custom(function = "validate_not_blank"))]
    pub content: String,
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
    #[serde(default)]
    pub character_ids: Vec<DbId>,
}

/// `character_ids`, when present, replaces the linked characters.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGuide {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(max = 100000), custom(function = "validate_not_blank"))]
    pub content: Option<String>,
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
    pub character_ids: Option<Vec<DbId>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// Listing order for guides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GuideSort {
    #[default]
    New,
    Popular,
    Views,
}

impl GuideSort {
    pub fn from_param(s: Option<&str>) -> Result<Self, CoreError> {
        match s {
            None | Some("new") => Ok(Self::New),
            Some("popular") => Ok(Self::Popular),
            Some("views") => Ok(Self::Views),
            Some(other) => Err(CoreError::Validation(format!(
                "Invalid sort '{other}'. Must be one of: new, popular, views"
            ))),
        }
    }

    /// `ORDER BY` clause; the id tie-breaker keeps pages stable.
    pub fn order_by(&self) -> &'static str {
        match self {
            Self::New => "COALESCE(g.published_at, g.created_at) DESC, g.id DESC",
            Self::Popular => "g.like_count DESC, g.id DESC",
            Self::Views => "g.view_count DESC, g.id DESC",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GuideFilter {
    pub search: Option<String>,
    pub author_id: Option<DbId>,
    pub character_id: Option<DbId>,
    pub arc_id: Option<DbId>,
    pub status: Option<GuideStatus>,
    pub sort: GuideSort,
}

/// Result of toggling a like.
#[derive(Debug, Clone, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}
