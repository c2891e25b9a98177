//! Handlers for the `/arcs` resource.
//!
//! Arcs nest through `parent_id`; updates that would make an arc its own
//! ancestor are rejected before they reach the database.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::language::TranslatableEntity;
use usogui_core::types::DbId;
use usogui_core::validation::validate_chapter_range;
use usogui_db::models::arc::{ArcFilter, CreateArc, UpdateArc};
use usogui_db::models::chapter::ChapterFilter;
use usogui_db::models::gamble::GambleFilter;
use usogui_db::repositories::{ArcRepo, ChapterRepo, GambleRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::middleware::reader::Reader;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ArcListParams {
    pub parent_id: Option<DbId>,
    pub series_id: Option<DbId>,
}

/// GET /api/v1/arcs
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<ArcListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let filter = ArcFilter {
        parent_id: params.parent_id,
        series_id: params.series_id,
    };
    let (arcs, total) = ArcRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Arc, arcs)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/arcs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let arc = ArcRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Arc", id))?;
    let data = reader
        .present_one(&state.pool, TranslatableEntity::Arc, arc)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/arcs/{id}/chapters
pub async fn list_chapters(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    ensure_arc_exists(&state, id).await?;
    let page = page.page_request();
    let filter = ChapterFilter {
        arc_id: Some(id),
        ..ChapterFilter::default()
    };
    let (chapters, total) = ChapterRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Chapter, chapters)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/arcs/{id}/gambles
pub async fn list_gambles(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    ensure_arc_exists(&state, id).await?;
    let page = page.page_request();
    let filter = GambleFilter {
        arc_id: Some(id),
        ..GambleFilter::default()
    };
    let (gambles, total) = GambleRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Gamble, gambles)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// POST /api/v1/arcs
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateArc>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_chapter_range(input.start_chapter, input.end_chapter)?;
    let arc = ArcRepo::create(&state.pool, &input).await?;
    tracing::info!(arc_id = arc.id, user_id = user.user_id, "Arc created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: arc })))
}

/// PUT /api/v1/arcs/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArc>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let existing = ArcRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Arc", id))?;
    validate_chapter_range(
        input.start_chapter.or(existing.start_chapter),
        input.end_chapter.or(existing.end_chapter),
    )?;

    if let Some(parent_id) = input.parent_id {
        if parent_id == id {
            return Err(AppError::validation("An arc cannot be its own parent"));
        }
        if ArcRepo::would_create_cycle(&state.pool, id, parent_id).await? {
            return Err(AppError::validation(
                "Parent arc is a descendant of this arc",
            ));
        }
    }

    let arc = ArcRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Arc", id))?;
    tracing::info!(arc_id = id, user_id = user.user_id, "Arc updated");
    Ok(Json(DataResponse { data: arc }))
}

/// DELETE /api/v1/arcs/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ArcRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Arc", id));
    }
    tracing::info!(arc_id = id, user_id = user.user_id, "Arc deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_arc_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ArcRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Arc", id))
}
