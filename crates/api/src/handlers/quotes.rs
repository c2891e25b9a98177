//! Handlers for the `/quotes` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::types::DbId;
use usogui_db::models::quote::{CreateQuote, QuoteFilter, UpdateQuote};
use usogui_db::repositories::QuoteRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireModerator;
use crate::middleware::reader::Reader;
use crate::query::{PaginationParams, SearchParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteListParams {
    pub character_id: Option<DbId>,
}

/// GET /api/v1/quotes
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<QuoteListParams>,
    Query(search): Query<SearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let filter = QuoteFilter {
        character_id: params.character_id,
        search: search.term().map(str::to_string),
        max_chapter: reader.gate.max_chapter(),
    };
    let (quotes, total) = QuoteRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(PaginatedResponse::new(
        reader.gate.apply_all(quotes),
        page,
        total,
    )))
}

/// GET /api/v1/quotes/random
///
/// Picks only among quotes the reader has already reached; `data` is null
/// when there are none.
pub async fn random(
    State(state): State<AppState>,
    reader: Reader,
) -> AppResult<impl IntoResponse> {
    let quote = QuoteRepo::random(&state.pool, reader.gate.max_chapter()).await?;
    Ok(Json(DataResponse {
        data: quote.map(|quote| reader.gate.apply(quote)),
    }))
}

/// GET /api/v1/quotes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let quote = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", id))?;
    Ok(Json(DataResponse {
        data: reader.gate.apply(quote),
    }))
}

/// POST /api/v1/quotes
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuote>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let quote = QuoteRepo::create(&state.pool, &input, auth.user_id).await?;
    tracing::info!(quote_id = quote.id, user_id = auth.user_id, "Quote submitted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: quote })))
}

/// PUT /api/v1/quotes/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuote>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let existing = QuoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", id))?;
    if !auth.owns_or_moderates(existing.submitted_by) {
        return Err(AppError::forbidden(
            "Only the submitter or a moderator can edit this quote",
        ));
    }

    let quote = QuoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Quote", id))?;
    tracing::info!(quote_id = id, user_id = auth.user_id, "Quote updated");
    Ok(Json(DataResponse { data: quote }))
}

/// DELETE /api/v1/quotes/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !QuoteRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Quote", id));
    }
    tracing::info!(quote_id = id, user_id = user.user_id, "Quote deleted");
    Ok(StatusCode::NO_CONTENT)
}
