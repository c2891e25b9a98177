//! Cross-entity search results.

use serde::Serialize;
use sqlx::FromRow;
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId};

/// One search match: enough to render a result line and link to the entity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchHit {
    pub id: DbId,
    pub name: String,
    pub snippet: Option<String>,
    pub chapter: Option<ChapterNumber>,
}

impl SpoilerGated for SearchHit {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        self.chapter
    }

    fn redact(&mut self) {
        self.snippet = None;
    }
}
