//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Paginated listings return
//! the page of rows together with the total row count for the same filter.

pub mod arc_repo;
pub mod chapter_repo;
pub mod character_repo;
pub mod event_repo;
pub mod faction_repo;
pub mod gamble_repo;
pub mod guide_repo;
pub mod media_repo;
pub mod quote_repo;
pub mod search_repo;
pub mod series_repo;
pub mod session_repo;
pub mod tag_repo;
pub mod translation_repo;
pub mod user_repo;
pub mod volume_repo;

pub use arc_repo::ArcRepo;
pub use chapter_repo::ChapterRepo;
pub use character_repo::CharacterRepo;
pub use event_repo::EventRepo;
pub use faction_repo::FactionRepo;
pub use gamble_repo::GambleRepo;
pub use guide_repo::GuideRepo;
pub use media_repo::MediaRepo;
pub use quote_repo::QuoteRepo;
pub use search_repo::SearchRepo;
pub use series_repo::SeriesRepo;
pub use session_repo::SessionRepo;
pub use tag_repo::TagRepo;
pub use translation_repo::TranslationRepo;
pub use user_repo::UserRepo;
pub use volume_repo::VolumeRepo;
