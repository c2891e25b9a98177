//! Gambles, their sides (teams) and rounds.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::language::{overlay_optional, overlay_text, Translatable, TranslatedText};
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use usogui_core::validation::validate_not_blank;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gamble {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub win_condition: Option<String>,
    pub outcome: Option<String>,
    pub chapter_number: Option<ChapterNumber>,
    pub end_chapter: Option<ChapterNumber>,
    pub arc_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpoilerGated for Gamble {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        self.chapter_number
    }

    fn redact(&mut self) {
        self.description = None;
        self.rules = None;
        self.win_condition = None;
        self.outcome = None;
        self.end_chapter = None;
    }
}

impl Translatable for Gamble {
    fn translation_key(&self) -> DbId {
        self.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        overlay_text(&mut self.name, text.name.as_deref());
        overlay_optional(&mut self.description, text.description.as_deref());
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGamble {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub win_condition: Option<String>,
    pub outcome: Option<String>,
    #[validate(range(min = 1))]
    pub chapter_number: Option<ChapterNumber>,
    #[validate(range(min = 1))]
    pub end_chapter: Option<ChapterNumber>,
    pub arc_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGamble {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub rules: Option<String>,
    pub win_condition: Option<String>,
    pub outcome: Option<String>,
    #[validate(range(min = 1))]
    pub chapter_number: Option<ChapterNumber>,
    #[validate(range(min = 1))]
    pub end_chapter: Option<ChapterNumber>,
    pub arc_id: Option<DbId>,
}

#[derive(Debug, Clone, Default)]
pub struct GambleFilter {
    pub arc_id: Option<DbId>,
    /// Gambles where the character sits on any team.
    pub character_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One side of a gamble. `member_ids` is aggregated from `gamble_team_members`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GambleTeam {
    pub id: DbId,
    pub gamble_id: DbId,
    pub name: String,
    pub faction_id: Option<DbId>,
    pub is_winner: bool,
    pub member_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGambleTeam {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub faction_id: Option<DbId>,
    pub is_winner: Option<bool>,
    #[serde(default)]
    pub member_ids: Vec<DbId>,
}

/// `member_ids`, when present, replaces the whole roster.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGambleTeam {
    #[validate(length(max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub faction_id: Option<DbId>,
    pub is_winner: Option<bool>,
    pub member_ids: Option<Vec<DbId>>,
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GambleRound {
    pub id: DbId,
    pub gamble_id: DbId,
    pub round_number: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub outcome: Option<String>,
    pub winner_team_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGambleRound {
    #[validate(range(min = 1))]
    pub round_number: i32,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub outcome: Option<String>,
    pub winner_team_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGambleRound {
    #[validate(range(min = 1))]
    pub round_number: Option<i32>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub outcome: Option<String>,
    pub winner_team_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Detail view
// ---------------------------------------------------------------------------

/// A gamble with its teams and rounds, gated as one unit.
#[derive(Debug, Clone, Serialize)]
pub struct GambleDetail {
    #[serde(flatten)]
    pub gamble: Gamble,
    pub teams: Vec<GambleTeam>,
    pub rounds: Vec<GambleRound>,
}

impl SpoilerGated for GambleDetail {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        self.gamble.spoiler_chapter()
    }

    fn redact(&mut self) {
        self.gamble.redact();
        for team in &mut self.teams {
            team.is_winner = false;
        }
        for round in &mut self.rounds {
            round.description = None;
            round.outcome = None;
            round.winner_team_id = None;
        }
    }
}

impl Translatable for GambleDetail {
    fn translation_key(&self) -> DbId {
        self.gamble.id
    }

    fn apply_translation(&mut self, text: &TranslatedText) {
        self.gamble.apply_translation(text);
    }
}
