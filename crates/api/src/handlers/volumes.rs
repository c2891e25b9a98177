//! Handlers for the `/volumes` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::language::TranslatableEntity;
use usogui_core::types::DbId;
use usogui_core::validation::validate_chapter_range;
use usogui_db::models::volume::{CreateVolume, UpdateVolume, VolumeFilter};
use usogui_db::repositories::VolumeRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::middleware::reader::Reader;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VolumeListParams {
    pub series_id: Option<DbId>,
}

/// GET /api/v1/volumes
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<VolumeListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let filter = VolumeFilter {
        series_id: params.series_id,
    };
    let (mut volumes, total) = VolumeRepo::list(&state.pool, &filter, page).await?;
    reader
        .localize(&state.pool, TranslatableEntity::Volume, &mut volumes)
        .await?;
    Ok(Json(PaginatedResponse::new(volumes, page, total)))
}

/// GET /api/v1/volumes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let volume = VolumeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Volume", id))?;
    let mut volumes = [volume];
    reader
        .localize(&state.pool, TranslatableEntity::Volume, &mut volumes)
        .await?;
    let [volume] = volumes;
    Ok(Json(DataResponse { data: volume }))
}

/// POST /api/v1/volumes
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateVolume>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_chapter_range(Some(input.start_chapter), Some(input.end_chapter))?;
    let volume = VolumeRepo::create(&state.pool, &input).await?;
    tracing::info!(volume_id = volume.id, number = volume.number, user_id = user.user_id, "Volume created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: volume })))
}

/// PUT /api/v1/volumes/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVolume>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let existing = VolumeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Volume", id))?;
    validate_chapter_range(
        Some(input.start_chapter.unwrap_or(existing.start_chapter)),
        Some(input.end_chapter.unwrap_or(existing.end_chapter)),
    )?;

    let volume = VolumeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Volume", id))?;
    tracing::info!(volume_id = id, user_id = user.user_id, "Volume updated");
    Ok(Json(DataResponse { data: volume }))
}

/// DELETE /api/v1/volumes/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !VolumeRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Volume", id));
    }
    tracing::info!(volume_id = id, user_id = user.user_id, "Volume deleted");
    Ok(StatusCode::NO_CONTENT)
}
