//! Media submission rules and URL classification.
//!
//! Media rows only ever store links. Classification picks the hosting
//! platform from the URL so the resolver knows which oEmbed endpoint (if any)
//! to ask for metadata, and which media type to assume when the submitter
//! did not say.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;
use crate::roles::Role;

// ---------------------------------------------------------------------------
// Enumerations (must match CHECK constraints on `media`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl MediaType {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            _ => Err(CoreError::Validation(format!(
                "Invalid media type '{s}'. Must be one of: image, video, audio"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    Pending,
    Approved,
    Rejected,
}

impl MediaStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CoreError::Validation(format!(
                "Invalid media status '{s}'. Must be one of: pending, approved, rejected"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Status assigned to a fresh submission. Moderators skip the queue.
    pub fn initial_for(role: Role) -> Self {
        if role.is_moderator() {
            Self::Approved
        } else {
            Self::Pending
        }
    }

    /// Only queued submissions can be approved or rejected.
    pub fn ensure_reviewable(&self) -> Result<(), CoreError> {
        match self {
            Self::Pending => Ok(()),
            other => Err(CoreError::Conflict(format!(
                "Media is already {} and cannot be reviewed again",
                other.as_str()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaOwnerType {
    Character,
    Arc,
    Event,
    Gamble,
    Faction,
    Volume,
    User,
}

pub const VALID_OWNER_TYPES: &[&str] = &[
    "character", "arc", "event", "gamble", "faction", "volume", "user",
];

impl MediaOwnerType {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "character" => Ok(Self::Character),
            "arc" => Ok(Self::Arc),
            "event" => Ok(Self::Event),
            "gamble" => Ok(Self::Gamble),
            "faction" => Ok(Self::Faction),
            "volume" => Ok(Self::Volume),
            "user" => Ok(Self::User),
            _ => Err(CoreError::Validation(format!(
                "Invalid owner type '{s}'. Must be one of: {}",
                VALID_OWNER_TYPES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Arc => "arc",
            Self::Event => "event",
            Self::Gamble => "gamble",
            Self::Faction => "faction",
            Self::Volume => "volume",
            Self::User => "user",
        }
    }

    /// Table the owner id must exist in.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Arc => "arcs",
            Self::Event => "events",
            Self::Gamble => "gambles",
            Self::Faction => "factions",
            Self::Volume => "volumes",
            Self::User => "users",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPurpose {
    Gallery,
    EntityDisplay,
}

impl MediaPurpose {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "gallery" => Ok(Self::Gallery),
            "entity_display" => Ok(Self::EntityDisplay),
            _ => Err(CoreError::Validation(format!(
                "Invalid media purpose '{s}'. Must be one of: gallery, entity_display"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::EntityDisplay => "entity_display",
        }
    }
}

/// A rejection must tell the submitter why.
pub fn validate_rejection_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A rejection reason is required".into(),
        ));
    }
    if reason.len() > 1000 {
        return Err(CoreError::Validation(
            "Rejection reason must be at most 1000 characters".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Platform classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPlatform {
    Youtube,
    Vimeo,
    Twitter,
    Reddit,
    Soundcloud,
    Deviantart,
    Pixiv,
    Tiktok,
    Direct,
    Unknown,
}

/// Parsed pieces of an `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Lowercase host; IPv6 literals keep their brackets.
    pub host: String,
    pub path: String,
}

static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|shorts/|embed/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("valid regex")
});

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "avif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "wav", "flac"];

/// Split an `http`/`https` URL into lowercase host and path.
///
/// Userinfo is dropped, so `https://youtube.com@evil.example/` is
/// attributed to `evil.example`.
pub fn parse_url(url: &str) -> Result<UrlParts, CoreError> {
    let invalid =
        || CoreError::Validation("Media URL must be an absolute http or https URL".into());
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    let host = parsed.host_str().ok_or_else(invalid)?;
    Ok(UrlParts {
        host: host.to_ascii_lowercase(),
        path: parsed.path().to_string(),
    })
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn extension_type(path: &str) -> Option<MediaType> {
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Video)
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Audio)
    } else {
        None
    }
}

impl MediaPlatform {
    /// Try each platform heuristic in turn and return the first that matches.
    pub fn classify(url: &str) -> Result<(Self, Option<MediaType>), CoreError> {
        let parts = parse_url(url)?;
        let host = parts.host.as_str();

        let platform = if host_matches(host, "youtube.com") || host == "youtu.be" {
            Self::Youtube
        } else if host_matches(host, "vimeo.com") {
            Self::Vimeo
        } else if host_matches(host, "twitter.com") || host_matches(host, "x.com") {
            Self::Twitter
        } else if host_matches(host, "reddit.com") {
            Self::Reddit
        } else if host_matches(host, "soundcloud.com") {
            Self::Soundcloud
        } else if host_matches(host, "deviantart.com") {
            Self::Deviantart
        } else if host_matches(host, "pixiv.net") {
            Self::Pixiv
        } else if host_matches(host, "tiktok.com") {
            Self::Tiktok
        } else if let Some(media_type) = extension_type(&parts.path) {
            return Ok((Self::Direct, Some(media_type)));
        } else {
            Self::Unknown
        };

        Ok((platform, platform.default_media_type()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Vimeo => "vimeo",
            Self::Twitter => "twitter",
            Self::Reddit => "reddit",
            Self::Soundcloud => "soundcloud",
            Self::Deviantart => "deviantart",
            Self::Pixiv => "pixiv",
            Self::Tiktok => "tiktok",
            Self::Direct => "direct",
            Self::Unknown => "unknown",
        }
    }

    pub fn default_media_type(&self) -> Option<MediaType> {
        match self {
            Self::Youtube | Self::Vimeo | Self::Tiktok => Some(MediaType::Video),
            Self::Twitter | Self::Reddit | Self::Deviantart | Self::Pixiv => Some(MediaType::Image),
            Self::Soundcloud => Some(MediaType::Audio),
            Self::Direct | Self::Unknown => None,
        }
    }

    /// The platform's oEmbed endpoint. The page URL goes in the `url` query
    /// parameter; `format=json` is always sent.
    pub fn oembed_endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Youtube => Some("https://www.youtube.com/oembed"),
            Self::Vimeo => Some("https://vimeo.com/api/oembed.json"),
            Self::Twitter => Some("https://publish.twitter.com/oembed"),
            Self::Reddit => Some("https://www.reddit.com/oembed"),
            Self::Soundcloud => Some("https://soundcloud.com/oembed"),
            Self::Deviantart => Some("https://backend.deviantart.com/oembed"),
            Self::Tiktok => Some("https://www.tiktok.com/oembed"),
            Self::Pixiv | Self::Direct | Self::Unknown => None,
        }
    }
}

/// Extract the 11-character video id from any YouTube URL shape.
pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Static thumbnail YouTube serves for every public video.
pub fn youtube_thumbnail(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn classifies_youtube_variants() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://m.youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            let (platform, media_type) = MediaPlatform::classify(url).unwrap();
            assert_eq!(platform, MediaPlatform::Youtube, "{url}");
            assert_eq!(media_type, Some(MediaType::Video));
            assert_eq!(youtube_video_id(url).as_deref(), Some("dQw4w9WgXcQ"));
        }
    }

    #[test]
    fn youtube_id_found_after_other_params() {
        let id = youtube_video_id("https://www.youtube.com/watch?list=abc&v=abcdefghijk&t=3");
        assert_eq!(id.as_deref(), Some("abcdefghijk"));
    }

    #[test]
    fn classifies_social_platforms() {
        let cases = [
            ("https://x.com/user/status/1", MediaPlatform::Twitter),
            ("https://twitter.com/user/status/1", MediaPlatform::Twitter),
            ("https://www.reddit.com/r/Usogui/comments/abc", MediaPlatform::Reddit),
            ("https://soundcloud.com/artist/track", MediaPlatform::Soundcloud),
            ("https://artist.deviantart.com/art/baku-1", MediaPlatform::Deviantart),
            ("https://www.pixiv.net/en/artworks/123", MediaPlatform::Pixiv),
            ("https://vimeo.com/12345", MediaPlatform::Vimeo),
            ("https://www.tiktok.com/@user/video/1", MediaPlatform::Tiktok),
        ];
        for (url, expected) in cases {
            assert_eq!(MediaPlatform::classify(url).unwrap().0, expected, "{url}");
        }
    }

    #[test]
    fn lookalike_hosts_do_not_match() {
        let (platform, _) = MediaPlatform::classify("https://notyoutube.com/watch?v=x").unwrap();
        assert_eq!(platform, MediaPlatform::Unknown);
    }

    #[test]
    fn userinfo_does_not_disguise_the_host() {
        let (platform, media_type) =
            MediaPlatform::classify("https://youtube.com@evil.example/clip.mp4").unwrap();
        assert_eq!(platform, MediaPlatform::Direct);
        assert_eq!(media_type, Some(MediaType::Video));
        assert_eq!(
            parse_url("https://youtube.com@evil.example/clip.mp4").unwrap().host,
            "evil.example"
        );
    }

    #[test]
    fn ipv6_hosts_parse() {
        let parts = parse_url("http://[::1]/a.png").unwrap();
        assert_eq!(parts.host, "[::1]");
        assert_eq!(parts.path, "/a.png");
        assert_eq!(
            MediaPlatform::classify("http://[::1]/a.png").unwrap(),
            (MediaPlatform::Direct, Some(MediaType::Image))
        );
    }

    #[test]
    fn hosts_are_lowercased_and_ports_dropped() {
        let parts = parse_url("HTTPS://WWW.YouTube.com:443/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(parts.host, "www.youtube.com");
        assert_eq!(parts.path, "/watch");
    }

    #[test]
    fn direct_files_classified_by_extension() {
        let (platform, media_type) =
            MediaPlatform::classify("https://cdn.example.org/art/baku.PNG").unwrap();
        assert_eq!(platform, MediaPlatform::Direct);
        assert_eq!(media_type, Some(MediaType::Image));

        let (_, media_type) = MediaPlatform::classify("https://cdn.example.org/op.webm?x=1").unwrap();
        assert_eq!(media_type, Some(MediaType::Video));

        let (_, media_type) = MediaPlatform::classify("http://cdn.example.org/theme.mp3").unwrap();
        assert_eq!(media_type, Some(MediaType::Audio));
    }

    #[test]
    fn unknown_sites_have_no_type() {
        let (platform, media_type) = MediaPlatform::classify("https://example.org/page").unwrap();
        assert_eq!(platform, MediaPlatform::Unknown);
        assert_eq!(media_type, None);
        assert!(platform.oembed_endpoint().is_none());
    }

    #[test]
    fn non_http_urls_rejected() {
        assert_matches!(
            MediaPlatform::classify("ftp://example.org/a.png"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            MediaPlatform::classify("javascript:alert(1)"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            MediaPlatform::classify("/relative/a.png"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn moderators_skip_review_queue() {
        assert_eq!(MediaStatus::initial_for(Role::User), MediaStatus::Pending);
        assert_eq!(MediaStatus::initial_for(Role::Editor), MediaStatus::Pending);
        assert_eq!(MediaStatus::initial_for(Role::Moderator), MediaStatus::Approved);
    }

    #[test]
    fn only_pending_media_is_reviewable() {
        assert!(MediaStatus::Pending.ensure_reviewable().is_ok());
        assert_matches!(
            MediaStatus::Approved.ensure_reviewable(),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn rejection_reason_required() {
        assert!(validate_rejection_reason("  ").is_err());
        assert!(validate_rejection_reason("Not Usogui related").is_ok());
    }

    #[test]
    fn owner_types_round_trip() {
        for name in VALID_OWNER_TYPES {
            assert_eq!(MediaOwnerType::from_str_db(name).unwrap().as_str(), *name);
        }
    }
}
