//! Handlers for the `/series` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use usogui_core::types::DbId;
use usogui_db::models::series::{CreateSeries, UpdateSeries};
use usogui_db::repositories::SeriesRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// GET /api/v1/series
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = params.page_request();
    let (series, total) = SeriesRepo::list(&state.pool, page).await?;
    Ok(Json(PaginatedResponse::new(series, page, total)))
}

/// GET /api/v1/series/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let series = SeriesRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Series", id))?;
    Ok(Json(DataResponse { data: series }))
}

/// POST /api/v1/series
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateSeries>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let series = SeriesRepo::create(&state.pool, &input).await?;
    tracing::info!(series_id = series.id, user_id = user.user_id, "Series created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: series })))
}

/// PUT /api/v1/series/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSeries>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let series = SeriesRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Series", id))?;
    tracing::info!(series_id = id, user_id = user.user_id, "Series updated");
    Ok(Json(DataResponse { data: series }))
}

/// DELETE /api/v1/series/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SeriesRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Series", id));
    }
    tracing::info!(series_id = id, user_id = user.user_id, "Series deleted");
    Ok(StatusCode::NO_CONTENT)
}
