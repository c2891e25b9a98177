//! Quote model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

/// A quote joined with the speaking character's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quote {
    pub id: DbId,
    /// Always stored; `None` only on a redacted quote.
    pub text: Option<String>,
    pub character_id: DbId,
    pub character_name: String,
    pub chapter_number: ChapterNumber,
    pub page_number: Option<i32>,
    pub context: Option<String>,
    pub submitted_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpoilerGated for Quote {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        Some(self.chapter_number)
    }

    fn redact(&mut self) {
        self.text = None;
        self.context = None;
        self.page_number = None;
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuote {
    #[validate(length(max = 2000), custom(function = "validate_not_blank"))]
    pub text: String,
    pub character_id: DbId,
    #[validate(range(min = 1))]
    pub chapter_number: ChapterNumber,
    #[validate(range(min = 1))]
    pub page_number: Option<i32>,
    #[validate(length(max = 2000))]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuote {
    #[validate(length(max = 2000), custom(function = "validate_not_blank"))]
    pub text: Option<String>,
    pub character_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub chapter_number: Option<ChapterNumber>,
    #[validate(range(min = 1))]
    pub page_number: Option<i32>,
    #[validate(length(max = 2000))]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub character_id: Option<DbId>,
    /// Matches quote text, but only on quotes at or before `max_chapter`.
    pub search: Option<String>,
    pub max_chapter: Option<ChapterNumber>,
}
