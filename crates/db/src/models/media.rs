//! Media submission model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::spoiler::SpoilerGated;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use validator::Validate;

/// A media row. Media points at externally hosted content by URL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    /// Always stored; `None` only on a redacted item.
    pub url: Option<String>,
    pub media_type: String,
    pub status: String,
    pub purpose: String,
    pub owner_type: String,
    pub owner_id: DbId,
    pub chapter_number: Option<ChapterNumber>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub platform: Option<String>,
    pub submitted_by: Option<DbId>,
    pub rejection_reason: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SpoilerGated for Media {
    fn spoiler_chapter(&self) -> Option<ChapterNumber> {
        self.chapter_number
    }

    fn redact(&mut self) {
        self.url = None;
        self.thumbnail_url = None;
        self.description = None;
    }
}

/// Submission payload. Type, platform, title and thumbnail are filled in
/// from URL resolution when the client leaves them out.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitMedia {
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    pub media_type: Option<String>,
    pub purpose: Option<String>,
    pub owner_type: String,
    pub owner_id: DbId,
    #[validate(range(min = 1))]
    pub chapter_number: Option<ChapterNumber>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Fully resolved insert.
#[derive(Debug, Clone)]
pub struct CreateMedia {
    pub url: String,
    pub media_type: String,
    pub status: String,
    pub purpose: String,
    pub owner_type: String,
    pub owner_id: DbId,
    pub chapter_number: Option<ChapterNumber>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub platform: Option<String>,
    pub submitted_by: Option<DbId>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    pub owner_type: Option<String>,
    pub owner_id: Option<DbId>,
    pub media_type: Option<String>,
    pub purpose: Option<String>,
    pub status: Option<String>,
}
