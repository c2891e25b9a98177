//! Handlers for the `/factions` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use usogui_core::language::TranslatableEntity;
use usogui_core::types::DbId;
use usogui_db::models::faction::{CreateFaction, UpdateFaction};
use usogui_db::repositories::FactionRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::middleware::reader::Reader;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// GET /api/v1/factions
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let (mut factions, total) = FactionRepo::list(&state.pool, page).await?;
    reader
        .localize(&state.pool, TranslatableEntity::Faction, &mut factions)
        .await?;
    Ok(Json(PaginatedResponse::new(factions, page, total)))
}

/// GET /api/v1/factions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let faction = FactionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Faction", id))?;
    let mut factions = [faction];
    reader
        .localize(&state.pool, TranslatableEntity::Faction, &mut factions)
        .await?;
    let [faction] = factions;
    Ok(Json(DataResponse { data: faction }))
}

/// GET /api/v1/factions/{id}/members
///
/// Members the reader has not met yet come back redacted.
pub async fn list_members(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    FactionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Faction", id))?;
    let members = FactionRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: reader.gate.apply_all(members),
    }))
}

/// POST /api/v1/factions
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateFaction>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let faction = FactionRepo::create(&state.pool, &input).await?;
    tracing::info!(faction_id = faction.id, user_id = user.user_id, "Faction created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: faction })))
}

/// PUT /api/v1/factions/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFaction>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let faction = FactionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Faction", id))?;
    tracing::info!(faction_id = id, user_id = user.user_id, "Faction updated");
    Ok(Json(DataResponse { data: faction }))
}

/// DELETE /api/v1/factions/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !FactionRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Faction", id));
    }
    tracing::info!(faction_id = id, user_id = user.user_id, "Faction deleted");
    Ok(StatusCode::NO_CONTENT)
}
