//! Languages and the translation overlay.
//!
//! Canonical text lives in English on each entity's own row. Every
//! translatable entity kind has a sibling `<entity>_translations` table keyed
//! by `(<entity>_id, language)`; [`TranslatableEntity`] is the lookup from
//! kind to table and foreign-key column.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ja,
    Es,
    Fr,
    De,
    Pt,
    Zh,
    Ko,
}

/// All supported language codes.
pub const VALID_LANGUAGES: &[&str] = &["en", "ja", "es", "fr", "de", "pt", "zh", "ko"];

impl Language {
    /// Parse an ISO 639-1 code, case-insensitively.
    pub fn from_code(code: &str) -> Result<Self, CoreError> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ja" => Ok(Self::Ja),
            "es" => Ok(Self::Es),
            "fr" => Ok(Self::Fr),
            "de" => Ok(Self::De),
            "pt" => Ok(Self::Pt),
            "zh" => Ok(Self::Zh),
            "ko" => Ok(Self::Ko),
            other => Err(CoreError::Validation(format!(
                "Unsupported language '{other}'. Must be one of: {}",
                VALID_LANGUAGES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Pt => "pt",
            Self::Zh => "zh",
            Self::Ko => "ko",
        }
    }

    /// English text is stored on the base row, never in a translation table.
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::En)
    }

    /// Resolve the optional `?lang=` query parameter, defaulting to English.
    pub fn resolve(param: Option<&str>) -> Result<Self, CoreError> {
        match param {
            Some(code) if !code.trim().is_empty() => Self::from_code(code),
            _ => Ok(Self::En),
        }
    }
}

// ---------------------------------------------------------------------------
// Translatable entity kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatableEntity {
    Character,
    Arc,
    Chapter,
    Volume,
    Faction,
    Gamble,
    Event,
}

pub const TRANSLATABLE_ENTITIES: &[&str] = &[
    "character", "arc", "chapter", "volume", "faction", "gamble", "event",
];

impl TranslatableEntity {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "character" => Ok(Self::Character),
            "arc" => Ok(Self::Arc),
            "chapter" => Ok(Self::Chapter),
            "volume" => Ok(Self::Volume),
            "faction" => Ok(Self::Faction),
            "gamble" => Ok(Self::Gamble),
            "event" => Ok(Self::Event),
            _ => Err(CoreError::Validation(format!(
                "Invalid translatable entity type '{s}'. Must be one of: {}",
                TRANSLATABLE_ENTITIES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Arc => "arc",
            Self::Chapter => "chapter",
            Self::Volume => "volume",
            Self::Faction => "faction",
            Self::Gamble => "gamble",
            Self::Event => "event",
        }
    }

    /// Human-readable name used in not-found errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Arc => "Arc",
            Self::Chapter => "Chapter",
            Self::Volume => "Volume",
            Self::Faction => "Faction",
            Self::Gamble => "Gamble",
            Self::Event => "Event",
        }
    }

    /// The base table holding canonical rows.
    pub fn base_table(&self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Arc => "arcs",
            Self::Chapter => "chapters",
            Self::Volume => "volumes",
            Self::Faction => "factions",
            Self::Gamble => "gambles",
            Self::Event => "events",
        }
    }

    /// The per-entity translation table.
    pub fn translation_table(&self) -> &'static str {
        match self {
            Self::Character => "character_translations",
            Self::Arc => "arc_translations",
            Self::Chapter => "chapter_translations",
            Self::Volume => "volume_translations",
            Self::Faction => "faction_translations",
            Self::Gamble => "gamble_translations",
            Self::Event => "event_translations",
        }
    }

    /// Foreign-key column in the translation table.
    pub fn foreign_key(&self) -> &'static str {
        match self {
            Self::Character => "character_id",
            Self::Arc => "arc_id",
            Self::Chapter => "chapter_id",
            Self::Volume => "volume_id",
            Self::Faction => "faction_id",
            Self::Gamble => "gamble_id",
            Self::Event => "event_id",
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// The translated text for one entity in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedText {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Implemented by entities whose name/description can be localized.
pub trait Translatable {
    fn translation_key(&self) -> DbId;

    /// Replace canonical text with the translated fields that are present.
    fn apply_translation(&mut self, text: &TranslatedText);
}

/// Replace `base` with `translated` when the translation is non-blank.
pub fn overlay_text(base: &mut String, translated: Option<&str>) {
    if let Some(t) = translated.filter(|t| !t.trim().is_empty()) {
        *base = t.to_string();
    }
}

/// Optional-field variant of [`overlay_text`].
pub fn overlay_optional(base: &mut Option<String>, translated: Option<&str>) {
    if let Some(t) = translated.filter(|t| !t.trim().is_empty()) {
        *base = Some(t.to_string());
    }
}

/// Apply a batch of translations (keyed by entity id) to a slice of entities.
/// Entities without a translation keep their English text.
pub fn apply_overlay<T: Translatable>(items: &mut [T], translations: &HashMap<DbId, TranslatedText>) {
    for item in items.iter_mut() {
        if let Some(text) = translations.get(&item.translation_key()) {
            item.apply_translation(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        id: DbId,
        name: String,
        description: Option<String>,
    }

    impl Translatable for Named {
        fn translation_key(&self) -> DbId {
            self.id
        }

        fn apply_translation(&mut self, text: &TranslatedText) {
            overlay_text(&mut self.name, text.name.as_deref());
            overlay_optional(&mut self.description, text.description.as_deref());
        }
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Language::from_code("JA").unwrap(), Language::Ja);
        assert_eq!(Language::from_code(" es ").unwrap(), Language::Es);
        assert!(Language::from_code("xx").is_err());
    }

    #[test]
    fn missing_lang_defaults_to_english() {
        assert_eq!(Language::resolve(None).unwrap(), Language::En);
        assert_eq!(Language::resolve(Some("")).unwrap(), Language::En);
        assert!(Language::En.is_canonical());
        assert!(!Language::Ja.is_canonical());
    }

    #[test]
    fn every_entity_maps_to_its_own_table() {
        for name in TRANSLATABLE_ENTITIES {
            let kind = TranslatableEntity::from_str_db(name).unwrap();
            assert_eq!(kind.as_str(), *name);
            assert_eq!(kind.translation_table(), format!("{name}_translations"));
            assert_eq!(kind.foreign_key(), format!("{name}_id"));
        }
    }

    #[test]
    fn overlay_replaces_present_fields_only() {
        let mut items = vec![
            Named {
                id: 1,
                name: "Baku Madarame".into(),
                description: Some("A gambler".into()),
            },
            Named {
                id: 2,
                name: "Kaji Takaomi".into(),
                description: None,
            },
        ];
        let mut map = HashMap::new();
        map.insert(
            1,
            TranslatedText {
                name: Some("斑目貘".into()),
                description: Some("   ".into()),
            },
        );

        apply_overlay(&mut items, &map);

        assert_eq!(items[0].name, "斑目貘");
        assert_eq!(items[0].description.as_deref(), Some("A gambler"));
        assert_eq!(items[1].name, "Kaji Takaomi");
    }
}
