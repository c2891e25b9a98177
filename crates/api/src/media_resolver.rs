//! Media URL resolution.
//!
//! [`MediaResolver`] turns a submitted link into display metadata. The URL
//! is classified by platform heuristics first; platforms that expose an
//! oEmbed endpoint are then asked for title, author, and thumbnail. Lookup
//! failures never fail the caller: the heuristic result is returned instead
//! and the failure is logged at WARN.
//!
//! Results are kept in a [`TtlCache`] behind a `tokio::sync::RwLock`, keyed
//! by the trimmed URL.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use usogui_core::cache::TtlCache;
use usogui_core::error::CoreError;
use usogui_core::media::{youtube_thumbnail, youtube_video_id, MediaPlatform, MediaType};

use crate::config::MediaResolverConfig;

/// Hard cap on cached URLs.
pub const CACHE_MAX_ENTRIES: usize = 1024;

/// Metadata for one media URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMedia {
    pub url: String,
    pub platform: MediaPlatform,
    pub media_type: Option<MediaType>,
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub provider_name: Option<String>,
    pub embed_html: Option<String>,
}

impl ResolvedMedia {
    fn heuristic(url: &str, platform: MediaPlatform, media_type: Option<MediaType>) -> Self {
        Self {
            url: url.to_string(),
            platform,
            media_type,
            title: None,
            author_name: None,
            thumbnail_url: None,
            provider_name: None,
            embed_html: None,
        }
    }

    fn merge_oembed(&mut self, oembed: OembedResponse) {
        self.title = oembed.title.filter(|s| !s.trim().is_empty());
        self.author_name = oembed.author_name;
        self.thumbnail_url = oembed.thumbnail_url;
        self.provider_name = oembed.provider_name;
        self.embed_html = oembed.html;
    }
}

/// The subset of an oEmbed JSON response we read.
#[derive(Debug, Default, Deserialize)]
pub struct OembedResponse {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub provider_name: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OembedError {
    /// Network, DNS, timeout, or body decoding failure.
    #[error("oEmbed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("oEmbed endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

pub struct MediaResolver {
    client: reqwest::Client,
    config: MediaResolverConfig,
    cache: RwLock<TtlCache<String, ResolvedMedia>>,
}

impl MediaResolver {
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (TLS backend unavailable).
    pub fn new(config: MediaResolverConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("usogui-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build reqwest HTTP client");
        let cache = RwLock::new(TtlCache::new(config.cache_ttl, CACHE_MAX_ENTRIES));
        Self {
            client,
            config,
            cache,
        }
    }

    /// Resolve `url` to display metadata.
    ///
    /// Only a malformed or non-http(s) URL is an error.
    pub async fn resolve(&self, url: &str) -> Result<ResolvedMedia, CoreError> {
        let key = url.trim().to_string();
        let (platform, media_type) = MediaPlatform::classify(&key)?;

        if let Some(hit) = self.cache.read().await.get(&key, Instant::now()) {
            tracing::debug!(url = %key, "Media resolve cache hit");
            return Ok(hit);
        }

        let mut resolved = ResolvedMedia::heuristic(&key, platform, media_type);

        if self.config.enabled {
            if let Some(endpoint) = platform.oembed_endpoint() {
                match self.fetch_oembed(endpoint, &key).await {
                    Ok(oembed) => resolved.merge_oembed(oembed),
                    Err(e) => tracing::warn!(
                        url = %key,
                        platform = platform.as_str(),
                        error = %e,
                        "oEmbed lookup failed, using URL heuristics"
                    ),
                }
            }
        }

        if platform == MediaPlatform::Youtube && resolved.thumbnail_url.is_none() {
            resolved.thumbnail_url = youtube_video_id(&key).map(|id| youtube_thumbnail(&id));
        }

        self.cache
            .write()
            .await
            .insert(key, resolved.clone(), Instant::now());
        Ok(resolved)
    }

    /// GET `endpoint?url=<url>&format=json` and decode the body.
    pub async fn fetch_oembed(
        &self,
        endpoint: &str,
        url: &str,
    ) -> Result<OembedResponse, OembedError> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("url", url), ("format", "json")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(OembedError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json::<OembedResponse>().await?)
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};

    use super::*;

    fn offline_resolver() -> MediaResolver {
        MediaResolver::new(MediaResolverConfig {
            enabled: false,
            cache_ttl: Duration::from_secs(60),
            request_timeout: Duration::from_secs(1),
        })
    }

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn youtube_falls_back_to_static_thumbnail() {
        let resolver = offline_resolver();
        let resolved = resolver
            .resolve("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(resolved.platform, MediaPlatform::Youtube);
        assert_eq!(resolved.media_type, Some(MediaType::Video));
        assert_eq!(
            resolved.thumbnail_url.as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
        assert_eq!(resolved.title, None);
    }

    #[tokio::test]
    async fn direct_files_classified_by_extension() {
        let resolver = offline_resolver();
        let resolved = resolver
            .resolve("https://cdn.example.com/art/baku.PNG")
            .await
            .unwrap();
        assert_eq!(resolved.platform, MediaPlatform::Direct);
        assert_eq!(resolved.media_type, Some(MediaType::Image));
    }

    #[tokio::test]
    async fn non_http_urls_rejected() {
        let resolver = offline_resolver();
        assert!(resolver.resolve("ftp://example.com/a.png").await.is_err());
        assert!(resolver.resolve("javascript:alert(1)").await.is_err());
        assert_eq!(resolver.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn results_are_cached_by_trimmed_url() {
        let resolver = offline_resolver();
        resolver.resolve("https://vimeo.com/123").await.unwrap();
        resolver.resolve("  https://vimeo.com/123  ").await.unwrap();
        assert_eq!(resolver.cached_entries().await, 1);
    }

    #[tokio::test]
    async fn fetch_oembed_parses_metadata() {
        let base = serve(Router::new().route(
            "/oembed",
            get(|| async {
                Json(serde_json::json!({
                    "title": "Usogui OP",
                    "author_name": "fan",
                    "thumbnail_url": "https://img.example.com/t.jpg",
                    "provider_name": "Example",
                    "html": "<iframe></iframe>",
                    "version": "1.0"
                }))
            }),
        ))
        .await;

        let resolver = offline_resolver();
        let oembed = resolver
            .fetch_oembed(&format!("{base}/oembed"), "https://example.com/v/1")
            .await
            .unwrap();
        assert_eq!(oembed.title.as_deref(), Some("Usogui OP"));
        assert_eq!(oembed.provider_name.as_deref(), Some("Example"));
        assert_eq!(oembed.html.as_deref(), Some("<iframe></iframe>"));
    }

    #[tokio::test]
    async fn fetch_oembed_reports_http_status() {
        let base = serve(Router::new().route(
            "/oembed",
            get(|| async { StatusCode::NOT_FOUND }),
        ))
        .await;

        let resolver = offline_resolver();
        let err = resolver
            .fetch_oembed(&format!("{base}/oembed"), "https://example.com/v/1")
            .await
            .unwrap_err();
        assert!(matches!(err, OembedError::HttpStatus(404)));
    }

    #[tokio::test]
    async fn fetch_oembed_rejects_non_json() {
        let base = serve(Router::new().route("/oembed", get(|| async { "not json" }))).await;

        let resolver = offline_resolver();
        let err = resolver
            .fetch_oembed(&format!("{base}/oembed"), "https://example.com/v/1")
            .await
            .unwrap_err();
        assert!(matches!(err, OembedError::Request(_)));
    }

    #[test]
    fn blank_oembed_title_is_dropped() {
        let mut resolved =
            ResolvedMedia::heuristic("https://vimeo.com/1", MediaPlatform::Vimeo, None);
        resolved.merge_oembed(OembedResponse {
            title: Some("  ".into()),
            ..OembedResponse::default()
        });
        assert_eq!(resolved.title, None);
    }
}
