//! Volume model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::{overlay_optional, Translatable, TranslatedText};
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use validator::Validate;

/// A collected volume, spanning `start_chapter..=end_chapter`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Volume {
    pub id: DbId,
    pub series_id: Option<DbId>,
    pub number: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub start_chapter: ChapterNumber,
    pub end_chapter: ChapterNumber,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Translatable for Volume {
    fn translation_key(&self) -> DbId {
        self.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        overlay_optional(&mut self.title, text.name.as_deref());
        overlay_optional(&mut self.description, text.description.as_deref());
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVolume {
    pub series_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub number: i32,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub cover_url: Option<String>,
    #[validate(range(min = 1))]
    pub start_chapter: ChapterNumber,
    #[validate(range(min = 1))]
    pub end_chapter: ChapterNumber,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVolume {
    pub series_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub number: Option<i32>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub cover_url: Option<String>,
    #[validate(range(min = 1))]
    pub start_chapter: Option<ChapterNumber>,
    #[validate(range(min = 1))]
    pub end_chapter: Option<ChapterNumber>,
}

#[derive(Debug, Clone, Default)]
pub struct VolumeFilter {
    pub series_id: Option<DbId>,
}
