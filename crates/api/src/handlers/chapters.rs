//! Handlers for the `/chapters` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::language::TranslatableEntity;
use usogui_core::types::DbId;
use usogui_db::models::chapter::{ChapterFilter, CreateChapter, UpdateChapter};
use usogui_db::repositories::ChapterRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::middleware::reader::Reader;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChapterListParams {
    pub volume_id: Option<DbId>,
    /// Chapters inside this arc's range.
    pub arc_id: Option<DbId>,
}

/// GET /api/v1/chapters
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<ChapterListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let filter = ChapterFilter {
        volume_id: params.volume_id,
        arc_id: params.arc_id,
    };
    let (chapters, total) = ChapterRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Chapter, chapters)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/chapters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let chapter = ChapterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", id))?;
    let data = reader
        .present_one(&state.pool, TranslatableEntity::Chapter, chapter)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/chapters
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateChapter>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let chapter = ChapterRepo::create(&state.pool, &input).await?;
    tracing::info!(chapter_id = chapter.id, number = chapter.number, user_id = user.user_id, "Chapter created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: chapter })))
}

/// PUT /api/v1/chapters/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateChapter>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let chapter = ChapterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", id))?;
    tracing::info!(chapter_id = id, user_id = user.user_id, "Chapter updated");
    Ok(Json(DataResponse { data: chapter }))
}

/// DELETE /api/v1/chapters/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ChapterRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Chapter", id));
    }
    tracing::info!(chapter_id = id, user_id = user.user_id, "Chapter deleted");
    Ok(StatusCode::NO_CONTENT)
}
