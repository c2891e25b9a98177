//! Field validation shared by request DTOs and handlers.
//!
//! The `validate_*` functions with a `validator::ValidationError` return type
//! plug into `#[validate(custom(function = ...))]` on DTOs; the others return
//! [`CoreError`] for direct use in handlers.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::error::CoreError;
use crate::types::ChapterNumber;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 30;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_TAG_LEN: usize = 50;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Usernames: 3-30 characters of ASCII letters, digits, and underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(error(
            "username_length",
            format!("must be between {MIN_USERNAME_LEN} and {MAX_USERNAME_LEN} characters"),
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(error(
            "username_charset",
            "may only contain letters, digits, and underscores",
        ));
    }
    Ok(())
}

/// Names and titles must contain something other than whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

/// Validate that a password meets minimum strength requirements.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

/// Chapter numbers start at 1.
pub fn validate_chapter(field: &str, chapter: ChapterNumber) -> Result<(), CoreError> {
    if chapter < 1 {
        return Err(CoreError::Validation(format!(
            "{field} must be a chapter number of at least 1"
        )));
    }
    Ok(())
}

/// Validate an optional `start..=end` chapter range.
pub fn validate_chapter_range(
    start: Option<ChapterNumber>,
    end: Option<ChapterNumber>,
) -> Result<(), CoreError> {
    if let Some(s) = start {
        validate_chapter("start_chapter", s)?;
    }
    if let Some(e) = end {
        validate_chapter("end_chapter", e)?;
    }
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(CoreError::Validation(format!(
                "start_chapter ({s}) must not be after end_chapter ({e})"
            )));
        }
    }
    Ok(())
}

/// Normalize a tag name: trimmed, lowercased, inner whitespace collapsed.
pub fn normalize_tag_name(raw: &str) -> Result<String, CoreError> {
    let normalized = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if normalized.is_empty() {
        return Err(CoreError::Validation("Tag name must not be empty".into()));
    }
    if normalized.chars().count() > MAX_TAG_LEN {
        return Err(CoreError::Validation(format!(
            "Tag name must be at most {MAX_TAG_LEN} characters"
        )));
    }
    Ok(normalized)
}

/// Escape `%`, `_` and `\` so user text can be embedded in an ILIKE pattern.
pub fn like_pattern(search: &str) -> String {
    let escaped = search
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn usernames() {
        assert!(validate_username("baku_m").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("baku madarame").is_err());
        assert!(validate_username("баку").is_err());
    }

    #[test]
    fn blank_names_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("Kakerou").is_ok());
    }

    #[test]
    fn password_too_short() {
        let msg = validate_password_strength("short", MIN_PASSWORD_LEN).unwrap_err();
        assert!(msg.contains("at least 8 characters"));
        assert!(validate_password_strength("long-enough", MIN_PASSWORD_LEN).is_ok());
    }

    #[test]
    fn chapter_ranges() {
        assert!(validate_chapter_range(Some(1), Some(1)).is_ok());
        assert!(validate_chapter_range(None, Some(10)).is_ok());
        assert_matches!(
            validate_chapter_range(Some(10), Some(9)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_chapter_range(Some(0), None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn tag_names_normalized() {
        assert_eq!(normalize_tag_name("  Tower   Of Karma ").unwrap(), "tower of karma");
        assert!(normalize_tag_name("   ").is_err());
        assert!(normalize_tag_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_real"), "%100\\%\\_real%");
        assert_eq!(like_pattern(" baku "), "%baku%");
    }
}
