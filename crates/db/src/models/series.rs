//! Series model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::types::{DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Series {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSeries {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to 0.
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSeries {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}
