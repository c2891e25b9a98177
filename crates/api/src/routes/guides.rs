use axum::routing::{get, post};
use axum::Router;

use crate::handlers::guides;
use crate::state::AppState;

/// Routes mounted at `/guides`.
///
/// ```text
/// GET, POST          /                 published list; create draft
/// GET                /mine
/// GET                /pending          (moderator)
/// GET, PUT, DELETE   /{id}
/// POST               /{id}/submit
/// POST               /{id}/approve     (moderator)
/// POST               /{id}/reject      (moderator)
/// POST               /{id}/unpublish   (moderator)
/// POST               /{id}/like
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(guides::list).post(guides::create))
        .route("/mine", get(guides::list_mine))
        .route("/pending", get(guides::list_pending))
        .route(
            "/{id}",
            get(guides::get_by_id)
                .put(guides::update)
                .delete(guides::delete),
        )
        .route("/{id}/submit", post(guides::submit))
        .route("/{id}/approve", post(guides::approve))
        .route("/{id}/reject", post(guides::reject))
        .route("/{id}/unpublish", post(guides::unpublish))
        .route("/{id}/like", post(guides::toggle_like))
}
