//! Story event model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::{overlay_optional, overlay_text, Translatable, TranslatedText};
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

/// A story event. `character_ids` is aggregated from `event_characters`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub status: String,
    pub chapter_number: ChapterNumber,
    pub spoiler_chapter: Option<ChapterNumber>,
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub character_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpoilerGated for Event {
    /// `spoiler_chapter` overrides the chapter the event happens in, for
    /// events whose significance only becomes clear later.
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        Some(self.spoiler_chapter.unwrap_or(self.chapter_number))
    }

    fn redact(&mut self) {
        self.description = None;
        self.character_ids.clear();
    }
}

impl Translatable for Event {
    fn translation_key(&self) -> DbId {
        self.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        overlay_text(&mut self.title, text.name.as_deref());
        overlay_optional(&mut self.description, text.description.as_deref());
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `decision`.
    pub event_type: Option<String>,
    #[validate(range(min = 1))]
    pub chapter_number: ChapterNumber,
    #[validate(range(min = 1))]
    pub spoiler_chapter: Option<ChapterNumber>,
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
    #[serde(default)]
    pub character_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    #[validate(range(min = 1))]
    pub chapter_number: Option<ChapterNumber>,
    #[validate(range(min = 1))]
    pub spoiler_chapter: Option<ChapterNumber>,
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetEventCharacters {
    pub character_ids: Vec<DbId>,
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
    pub character_id: Option<DbId>,
    pub event_type: Option<String>,
    /// `None` lists every status (moderation views).
    pub status: Option<String>,
}
