use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET, POST          /
/// GET, PUT, DELETE   /{id}
/// GET, PUT           /entity/{entity_type}/{entity_id}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list).post(tags::create))
        .route(
            "/{id}",
            get(tags::get_by_id).put(tags::update).delete(tags::delete),
        )
        .route(
            "/entity/{entity_type}/{entity_id}",
            get(tags::list_for_entity).put(tags::set_for_entity),
        )
}
