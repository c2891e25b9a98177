//! Character model, faction membership, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::{overlay_optional, overlay_text, Translatable, TranslatedText};
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub alternate_names: Vec<String>,
    pub description: Option<String>,
    pub backstory: Option<String>,
    pub first_appearance_chapter: Option<ChapterNumber>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpoilerGated for Character {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        self.first_appearance_chapter
    }

    fn redact(&mut self) {
        self.alternate_names.clear();
        self.description = None;
        self.backstory = None;
    }
}

impl Translatable for Character {
    fn translation_key(&self) -> DbId {
        self.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        overlay_text(&mut self.name, text.name.as_deref());
        overlay_optional(&mut self.description, text.description.as_deref());
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacter {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub alternate_names: Option<Vec<String>>,
    pub description: Option<String>,
    pub backstory: Option<String>,
    #[validate(range(min = 1))]
    pub first_appearance_chapter: Option<ChapterNumber>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub alternate_names: Option<Vec<String>>,
    pub description: Option<String>,
    pub backstory: Option<String>,
    #[validate(range(min = 1))]
    pub first_appearance_chapter: Option<ChapterNumber>,
}

#[derive(Debug, Clone, Default)]
pub struct CharacterFilter {
    /// Case-insensitive match on name or any alternate name.
    pub search: Option<String>,
    pub faction_id: Option<DbId>,
    /// Characters taking part in a gamble or event of this arc.
    pub arc_id: Option<DbId>,
    /// Reader progress. Alternate names of characters introduced later are
    /// not matched by `search`.
    pub max_chapter: Option<ChapterNumber>,
}

/// One faction a character belongs to, with their role in it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterFactionLink {
    pub faction_id: DbId,
    pub faction_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FactionMembershipInput {
    pub faction_id: DbId,
    #[validate(length(max = 200))]
    pub role: Option<String>,
}

/// Full replacement of a character's faction memberships.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetCharacterFactions {
    #[validate(nested)]
    pub factions: Vec<FactionMembershipInput>,
}
