//! Chapter model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::{overlay_optional, Translatable, TranslatedText};
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub id: DbId,
    pub number: ChapterNumber,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub volume_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpoilerGated for Chapter {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        Some(self.number)
    }

    fn redact(&mut self) {
        self.title = None;
        self.summary = None;
    }
}

impl Translatable for Chapter {
    fn translation_key(&self) -> DbId {
        self.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        overlay_optional(&mut self.title, text.name.as_deref());
        overlay_optional(&mut self.summary, text.description.as_deref());
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChapter {
    #[validate(range(min = 1))]
    pub number: ChapterNumber,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub summary: Option<String>,
    pub volume_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateChapter {
    #[validate(range(min = 1))]
    pub number: Option<ChapterNumber>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub summary: Option<String>,
    pub volume_id: Option<DbId>,
}

#[derive(Debug, Clone, Default)]
pub struct ChapterFilter {
    pub volume_id: Option<DbId>,
    /// Only chapters inside this arc's `start_chapter..=end_chapter`.
    pub arc_id: Option<DbId>,
}
