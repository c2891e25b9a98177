//! Faction model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::{overlay_optional, overlay_text, Translatable, TranslatedText};
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Faction {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Translatable for Faction {
    fn translation_key(&self) -> DbId {
        self.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        overlay_text(&mut self.name, text.name.as_deref());
        overlay_optional(&mut self.description, text.description.as_deref());
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFaction {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFaction {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A character listed as a member of a faction.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FactionMember {
    pub character_id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub first_appearance_chapter: Option<ChapterNumber>,
}

impl SpoilerGated for FactionMember {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        self.first_appearance_chapter
    }

    fn redact(&mut self) {
        self.role = None;
    }
}
