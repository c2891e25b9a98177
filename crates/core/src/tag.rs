//! Entities that tags can be attached to.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaggableEntity {
    Character,
    Arc,
    Event,
    Gamble,
    Guide,
    Faction,
}

/// Must match `ck_entity_tags_type` in the tags migration.
pub const TAGGABLE_ENTITIES: &[&str] = &["character", "arc", "event", "gamble", "guide", "faction"];

impl TaggableEntity {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "character" => Ok(Self::Character),
            "arc" => Ok(Self::Arc),
            "event" => Ok(Self::Event),
            "gamble" => Ok(Self::Gamble),
            "guide" => Ok(Self::Guide),
            "faction" => Ok(Self::Faction),
            _ => Err(CoreError::Validation(format!(
                "Invalid tag target '{s}'. Must be one of: {}",
                TAGGABLE_ENTITIES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Arc => "arc",
            Self::Event => "event",
            Self::Gamble => "gamble",
            Self::Guide => "guide",
            Self::Faction => "faction",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Arc => "Arc",
            Self::Event => "Event",
            Self::Gamble => "Gamble",
            Self::Guide => "Guide",
            Self::Faction => "Faction",
        }
    }

    /// Table holding the tagged rows.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Arc => "arcs",
            Self::Event => "events",
            Self::Gamble => "gambles",
            Self::Guide => "guides",
            Self::Faction => "factions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in TAGGABLE_ENTITIES {
            assert_eq!(TaggableEntity::from_str_db(name).unwrap().as_str(), *name);
        }
    }

    #[test]
    fn chapters_are_not_taggable() {
        assert!(TaggableEntity::from_str_db("chapter").is_err());
    }
}
