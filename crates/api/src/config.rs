use std::time::Duration;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the refresh-token cookie carries the `Secure` attribute.
    pub refresh_cookie_secure: bool,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// oEmbed lookup settings.
    pub media_resolver: MediaResolverConfig,
}

/// Settings for [`MediaResolver`](crate::media_resolver::MediaResolver).
#[derive(Debug, Clone)]
pub struct MediaResolverConfig {
    /// When false, only URL heuristics are used and no outbound request is made.
    pub enabled: bool,
    /// How long a resolved URL stays cached.
    pub cache_ttl: Duration,
    /// Timeout for a single oEmbed request.
    pub request_timeout: Duration,
}

impl Default for MediaResolverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_ttl: Duration::from_secs(3600),
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: &str) -> T {
    std::env::var(name)
        .unwrap_or_else(|_| default.into())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>()))
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `REFRESH_COOKIE_SECURE`      | `true`                  |
    /// | `MEDIA_RESOLVE_ENABLED`      | `true`                  |
    /// | `MEDIA_RESOLVE_TTL_SECS`     | `3600`                  |
    /// | `MEDIA_RESOLVE_TIMEOUT_SECS` | `5`                     |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on any value that does not parse, so misconfiguration fails
    /// at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", "3000");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30");
        let refresh_cookie_secure: bool = env_or("REFRESH_COOKIE_SECURE", "true");

        let media_resolver = MediaResolverConfig {
            enabled: env_or("MEDIA_RESOLVE_ENABLED", "true"),
            cache_ttl: Duration::from_secs(env_or("MEDIA_RESOLVE_TTL_SECS", "3600")),
            request_timeout: Duration::from_secs(env_or("MEDIA_RESOLVE_TIMEOUT_SECS", "5")),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            refresh_cookie_secure,
            jwt,
            media_resolver,
        }
    }
}
