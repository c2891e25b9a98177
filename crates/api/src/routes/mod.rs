pub mod auth;
pub mod content;
pub mod guides;
pub mod health;
pub mod media;
pub mod quotes;
pub mod search;
pub mod tags;
pub mod translations;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth            register, login, refresh, logout, me
/// /users           profiles, own settings, admin role management
///
/// /series          canonical content (public reads, editor writes)
/// /volumes
/// /chapters
/// /arcs
/// /characters
/// /factions
/// /gambles
/// /events
/// /tags
/// /translations/{entity_type}/{entity_id}
///
/// /guides          community guides and their review workflow
/// /quotes          user-submitted quotes
/// /media           media links and their moderation queue
/// /search          grouped cross-entity search
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/series", content::series_router())
        .nest("/volumes", content::volumes_router())
        .nest("/chapters", content::chapters_router())
        .nest("/arcs", content::arcs_router())
        .nest("/characters", content::characters_router())
        .nest("/factions", content::factions_router())
        .nest("/gambles", content::gambles_router())
        .nest("/events", content::events_router())
        .nest("/tags", tags::router())
        .nest("/translations", translations::router())
        .nest("/guides", guides::router())
        .nest("/quotes", quotes::router())
        .nest("/media", media::router())
        .nest("/search", search::router())
}
