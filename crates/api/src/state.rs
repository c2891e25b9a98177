use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media_resolver::MediaResolver;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and everything else sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: usogui_db::DbPool,
    /// Server configuration (JWT settings, cookie flags).
    pub config: Arc<ServerConfig>,
    /// oEmbed lookups with an in-memory TTL cache.
    pub media_resolver: Arc<MediaResolver>,
}

impl AppState {
    pub fn new(pool: usogui_db::DbPool, config: ServerConfig) -> Self {
        let media_resolver = Arc::new(MediaResolver::new(config.media_resolver.clone()));
        Self {
            pool,
            config: Arc::new(config),
            media_resolver,
        }
    }
}
