//! Story arc model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::{overlay_optional, overlay_text, Translatable, TranslatedText};
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

/// An arc. Arcs may nest through `parent_id` (e.g. sub-arcs of a long gamble).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoryArc {
    pub id: DbId,
    pub series_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub start_chapter: Option<ChapterNumber>,
    pub end_chapter: Option<ChapterNumber>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpoilerGated for StoryArc {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        self.start_chapter
    }

    fn redact(&mut self) {
        self.description = None;
        self.end_chapter = None;
    }
}

impl Translatable for StoryArc {
    fn translation_key(&self) -> DbId {
        self.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        overlay_text(&mut self.name, text.name.as_deref());
        overlay_optional(&mut self.description, text.description.as_deref());
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateArc {
    pub series_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    #[validate(range(min = 1))]
    pub start_chapter: Option<ChapterNumber>,
    #[validate(range(min = 1))]
    pub end_chapter: Option<ChapterNumber>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateArc {
    pub series_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    #[validate(range(min = 1))]
    pub start_chapter: Option<ChapterNumber>,
    #[validate(range(min = 1))]
    pub end_chapter: Option<ChapterNumber>,
}

#[derive(Debug, Clone, Default)]
pub struct ArcFilter {
    pub parent_id: Option<DbId>,
    pub series_id: Option<DbId>,
}
