use axum::routing::get;
use axum::Router;

use crate::handlers::quotes;
use crate::state::AppState;

/// Routes mounted at `/quotes`.
///
/// ```text
/// GET, POST          /                 ?character_id= ?search=
/// GET                /random
/// GET, PUT, DELETE   /{id}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quotes::list).post(quotes::create))
        .route("/random", get(quotes::random))
        .route(
            "/{id}",
            get(quotes::get_by_id)
                .put(quotes::update)
                .delete(quotes::delete),
        )
}
