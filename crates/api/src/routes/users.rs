use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                -> list (public profiles)
/// GET    /{id}            -> get_by_id
/// DELETE /{id}            -> deactivate (admin)
/// PUT    /{id}/role       -> update_role (admin)
/// PUT    /me/progress     -> update_progress
/// PUT    /me/profile      -> update_profile
/// PUT    /me/password     -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list))
        .route("/me/progress", put(users::update_progress))
        .route("/me/profile", put(users::update_profile))
        .route("/me/password", put(users::change_password))
        .route("/{id}", get(users::get_by_id).delete(users::deactivate))
        .route("/{id}/role", put(users::update_role))
}
