//! Handler for `/search`.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use usogui_core::spoiler::Gated;
use usogui_db::models::search::SearchHit;
use usogui_db::repositories::SearchRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::reader::Reader;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 5;
const MAX_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// Hits per group.
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub characters: Vec<Gated<SearchHit>>,
    pub arcs: Vec<Gated<SearchHit>>,
    pub gambles: Vec<Gated<SearchHit>>,
    pub factions: Vec<Gated<SearchHit>>,
    pub guides: Vec<Gated<SearchHit>>,
}

/// GET /api/v1/search?q=&limit=
///
/// Case-insensitive substring match, grouped by entity kind. Only published
/// guides are searched. Hidden narrative text is never matched, so a gated
/// reader cannot confirm a spoiler by searching for it.
pub async fn search(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let q = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".into()))?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let gate = reader.gate;
    let max_chapter = gate.max_chapter();
    let (characters, arcs, gambles, factions, guides) = tokio::try_join!(
        SearchRepo::characters(&state.pool, q, limit, max_chapter),
        SearchRepo::arcs(&state.pool, q, limit, max_chapter),
        SearchRepo::gambles(&state.pool, q, limit, max_chapter),
        SearchRepo::factions(&state.pool, q, limit),
        SearchRepo::guides(&state.pool, q, limit),
    )?;

    Ok(Json(DataResponse {
        data: SearchResults {
            characters: gate.apply_all(characters),
            arcs: gate.apply_all(arcs),
            gambles: gate.apply_all(gambles),
            factions: gate.apply_all(factions),
            guides: gate.apply_all(guides),
        },
    }))
}
