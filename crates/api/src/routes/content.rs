//! Routes for the canonical story content: series, volumes, chapters, arcs,
//! characters, factions, gambles, and events.
//!
//! Reads are public; create and update need an editor, delete a moderator.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{arcs, chapters, characters, events, factions, gambles, series, volumes};
use crate::state::AppState;

/// Mounted at `/series`.
pub fn series_router() -> Router<AppState> {
    Router::new()
        .route("/", get(series::list).post(series::create))
        .route(
            "/{id}",
            get(series::get_by_id)
                .put(series::update)
                .delete(series::delete),
        )
}

/// Mounted at `/volumes`. Lists accept `?series_id=`.
pub fn volumes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(volumes::list).post(volumes::create))
        .route(
            "/{id}",
            get(volumes::get_by_id)
                .put(volumes::update)
                .delete(volumes::delete),
        )
}

/// Mounted at `/chapters`. Lists accept `?volume_id=` and `?arc_id=`.
pub fn chapters_router() -> Router<AppState> {
    Router::new()
        .route("/", get(chapters::list).post(chapters::create))
        .route(
            "/{id}",
            get(chapters::get_by_id)
                .put(chapters::update)
                .delete(chapters::delete),
        )
}

/// Mounted at `/arcs`.
///
/// ```text
/// GET, POST          /                 ?parent_id= ?series_id=
/// GET, PUT, DELETE   /{id}
/// GET                /{id}/chapters
/// GET                /{id}/gambles
/// ```
pub fn arcs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(arcs::list).post(arcs::create))
        .route(
            "/{id}",
            get(arcs::get_by_id).put(arcs::update).delete(arcs::delete),
        )
        .route("/{id}/chapters", get(arcs::list_chapters))
        .route("/{id}/gambles", get(arcs::list_gambles))
}

/// Mounted at `/characters`.
///
/// ```text
/// GET, POST          /                 ?search= ?faction_id= ?arc_id=
/// GET, PUT, DELETE   /{id}
/// GET                /{id}/gambles
/// GET                /{id}/events
/// GET                /{id}/quotes
/// GET, PUT           /{id}/factions
/// ```
pub fn characters_router() -> Router<AppState> {
    Router::new()
        .route("/", get(characters::list).post(characters::create))
        .route(
            "/{id}",
            get(characters::get_by_id)
                .put(characters::update)
                .delete(characters::delete),
        )
        .route("/{id}/gambles", get(characters::list_gambles))
        .route("/{id}/events", get(characters::list_events))
        .route("/{id}/quotes", get(characters::list_quotes))
        .route(
            "/{id}/factions",
            get(characters::list_factions).put(characters::set_factions),
        )
}

/// Mounted at `/factions`.
pub fn factions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(factions::list).post(factions::create))
        .route(
            "/{id}",
            get(factions::get_by_id)
                .put(factions::update)
                .delete(factions::delete),
        )
        .route("/{id}/members", get(factions::list_members))
}

/// Mounted at `/gambles`.
///
/// ```text
/// GET, POST          /                          ?arc_id= ?character_id=
/// GET, PUT, DELETE   /{id}
/// GET, POST          /{id}/teams
/// PUT, DELETE        /{id}/teams/{team_id}
/// GET, POST          /{id}/rounds
/// PUT, DELETE        /{id}/rounds/{round_id}
/// ```
pub fn gambles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(gambles::list).post(gambles::create))
        .route(
            "/{id}",
            get(gambles::get_by_id)
                .put(gambles::update)
                .delete(gambles::delete),
        )
        .route(
            "/{id}/teams",
            get(gambles::list_teams).post(gambles::create_team),
        )
        .route(
            "/{id}/teams/{team_id}",
            put(gambles::update_team).delete(gambles::delete_team),
        )
        .route(
            "/{id}/rounds",
            get(gambles::list_rounds).post(gambles::create_round),
        )
        .route(
            "/{id}/rounds/{round_id}",
            put(gambles::update_round).delete(gambles::delete_round),
        )
}

/// Mounted at `/events`.
///
/// ```text
/// GET, POST          /                 ?arc_id= ?gamble_id= ?character_id= ?event_type=
/// GET, PUT, DELETE   /{id}
/// POST               /{id}/approve     (moderator)
/// PUT                /{id}/characters
/// ```
pub fn events_router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route(
            "/{id}",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::delete),
        )
        .route("/{id}/approve", post(events::approve))
        .route("/{id}/characters", put(events::set_characters))
}
