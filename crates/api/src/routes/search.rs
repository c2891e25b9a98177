use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Mounted at `/search`: `GET /?q=&limit=`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search::search))
}
