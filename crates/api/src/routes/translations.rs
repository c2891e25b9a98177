use axum::routing::get;
use axum::Router;

use crate::handlers::translations;
use crate::state::AppState;

/// Routes mounted at `/translations`.
///
/// ```text
/// GET                /{entity_type}/{entity_id}
/// GET, PUT, DELETE   /{entity_type}/{entity_id}/{lang}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{entity_type}/{entity_id}", get(translations::list))
        .route(
            "/{entity_type}/{entity_id}/{lang}",
            get(translations::get_one)
                .put(translations::upsert)
                .delete(translations::delete),
        )
}
