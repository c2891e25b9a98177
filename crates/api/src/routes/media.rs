use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// GET, POST          /                 approved list; submit
/// GET                /pending          (moderator)
/// GET                /resolve?url=
/// GET, DELETE        /{id}
/// POST               /{id}/approve     (moderator)
/// POST               /{id}/reject      (moderator)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list).post(media::submit))
        .route("/pending", get(media::list_pending))
        .route("/resolve", get(media::resolve))
        .route("/{id}", get(media::get_by_id).delete(media::delete))
        .route("/{id}/approve", post(media::approve))
        .route("/{id}/reject", post(media::reject))
}
