//! Spoiler gating based on a reader's chapter progress.
//!
//! A reader who has read up to chapter `N` may see anything introduced at or
//! before `N`. Content introduced later is returned redacted: its identifying
//! fields survive, its narrative fields are blanked, and the wrapper carries
//! `"spoiler": true`.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::ChapterNumber;

/// Implemented by every entity that can reveal plot information.
pub trait SpoilerGated {
    /// The chapter a reader must have reached to see this entity in full.
    /// `None` means the entity is never gated.
    fn spoiler_chapter(&self) -> Option<ChapterNumber>;

    /// Blank out the fields that would spoil a reader who has not reached
    /// [`spoiler_chapter`](Self::spoiler_chapter).
    fn redact(&mut self);
}

/// An entity after gating, serialized flat with an extra `spoiler` flag.
#[derive(Debug, Clone, Serialize)]
pub struct Gated<T> {
    #[serde(flatten)]
    pub item: T,
    pub spoiler: bool,
}

/// How much of the story the current reader has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoilerGate {
    /// No progress known: nothing is hidden.
    Ungated,
    /// The reader has read through this chapter (inclusive).
    UpTo(ChapterNumber),
}

impl SpoilerGate {
    /// Resolve the gate for a request.
    ///
    /// An explicit `?progress=` value wins over the stored progress of the
    /// authenticated user. With neither, the request is ungated.
    pub fn resolve(
        explicit: Option<ChapterNumber>,
        stored: Option<ChapterNumber>,
    ) -> Result<Self, CoreError> {
        if let Some(p) = explicit {
            if p < 0 {
                return Err(CoreError::Validation(
                    "progress must be zero or a positive chapter number".into(),
                ));
            }
            return Ok(Self::UpTo(p));
        }
        Ok(match stored {
            Some(p) => Self::UpTo(p.max(0)),
            None => Self::Ungated,
        })
    }

    /// Whether content introduced at `chapter` is visible to this reader.
    pub fn reveals(&self, chapter: Option<ChapterNumber>) -> bool {
        match (self, chapter) {
            (Self::Ungated, _) | (_, None) => true,
            (Self::UpTo(progress), Some(c)) => c <= *progress,
        }
    }

    /// The last chapter this reader has reached, or `None` when ungated.
    ///
    /// Repositories use it to keep narrative columns of unread rows out of
    /// text matching.
    pub fn max_chapter(&self) -> Option<ChapterNumber> {
        match self {
            Self::Ungated => None,
            Self::UpTo(progress) => Some(*progress),
        }
    }

    /// Gate a single entity, redacting it when it lies beyond the reader.
    pub fn apply<T: SpoilerGated>(&self, mut item: T) -> Gated<T> {
        let spoiler = !self.reveals(item.spoiler_chapter());
        if spoiler {
            item.redact();
        }
        Gated { item, spoiler }
    }

    pub fn apply_all<T: SpoilerGated>(&self, items: Vec<T>) -> Vec<Gated<T>> {
        items.into_iter().map(|item| self.apply(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug, Clone, Serialize)]
    struct Scene {
        name: String,
        chapter: Option<i32>,
        summary: Option<String>,
    }

    impl SpoilerGated for Scene {
        fn spoiler_chapter(&self) -> Option<ChapterNumber> {
            self.chapter
        }

        fn redact(&mut self) {
            self.summary = None;
        }
    }

    fn scene(chapter: Option<i32>) -> Scene {
        Scene {
            name: "Tower of Karma".into(),
            chapter,
            summary: Some("Baku climbs".into()),
        }
    }

    #[test]
    fn explicit_progress_wins_over_stored() {
        let gate = SpoilerGate::resolve(Some(10), Some(200)).unwrap();
        assert_eq!(gate, SpoilerGate::UpTo(10));
    }

    #[test]
    fn stored_progress_used_when_no_explicit() {
        let gate = SpoilerGate::resolve(None, Some(42)).unwrap();
        assert_eq!(gate, SpoilerGate::UpTo(42));
    }

    #[test]
    fn anonymous_reader_is_ungated() {
        assert_eq!(SpoilerGate::resolve(None, None).unwrap(), SpoilerGate::Ungated);
    }

    #[test]
    fn negative_progress_rejected() {
        assert_matches!(
            SpoilerGate::resolve(Some(-1), None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn reveals_inclusive_of_current_chapter() {
        let gate = SpoilerGate::UpTo(50);
        assert!(gate.reveals(Some(50)));
        assert!(gate.reveals(Some(1)));
        assert!(!gate.reveals(Some(51)));
        assert!(gate.reveals(None));
    }

    #[test]
    fn max_chapter_follows_gate() {
        assert_eq!(SpoilerGate::Ungated.max_chapter(), None);
        assert_eq!(SpoilerGate::UpTo(0).max_chapter(), Some(0));
        assert_eq!(SpoilerGate::UpTo(120).max_chapter(), Some(120));
    }

    #[test]
    fn apply_redacts_future_content() {
        let gate = SpoilerGate::UpTo(5);
        let gated = gate.apply(scene(Some(9)));
        assert!(gated.spoiler);
        assert_eq!(gated.item.summary, None);
        assert_eq!(gated.item.name, "Tower of Karma");
    }

    #[test]
    fn apply_keeps_read_content() {
        let gated = SpoilerGate::UpTo(9).apply(scene(Some(9)));
        assert!(!gated.spoiler);
        assert_eq!(gated.item.summary.as_deref(), Some("Baku climbs"));
    }

    #[test]
    fn gated_serializes_flat() {
        let gated = SpoilerGate::Ungated.apply(scene(Some(300)));
        let json = serde_json::to_value(&gated).unwrap();
        assert_eq!(json["name"], "Tower of Karma");
        assert_eq!(json["spoiler"], false);
    }

    #[test]
    fn apply_all_preserves_order() {
        let gated = SpoilerGate::UpTo(3).apply_all(vec![scene(Some(1)), scene(Some(4))]);
        assert_eq!(
            gated.iter().map(|g| g.spoiler).collect::<Vec<_>>(),
            vec![false, true]
        );
    }
}
