//! Handlers for the `/gambles` resource, its teams, and its rounds.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::language::TranslatableEntity;
use usogui_core::spoiler::Gated;
use usogui_core::types::DbId;
use usogui_core::validation::validate_chapter_range;
use usogui_db::models::gamble::{
    CreateGamble, CreateGambleRound, CreateGambleTeam, GambleDetail, GambleFilter,
    UpdateGamble, UpdateGambleRound, UpdateGambleTeam,
};
use usogui_db::repositories::GambleRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::middleware::reader::Reader;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GambleListParams {
    pub arc_id: Option<DbId>,
    pub character_id: Option<DbId>,
}

/// GET /api/v1/gambles
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<GambleListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let filter = GambleFilter {
        arc_id: params.arc_id,
        character_id: params.character_id,
    };
    let (gambles, total) = GambleRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Gamble, gambles)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/gambles/{id}
///
/// The gamble with its teams and rounds, gated as one unit.
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let data = load_detail(&state, &reader, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/gambles
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateGamble>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_chapter_range(input.chapter_number, input.end_chapter)?;
    let gamble = GambleRepo::create(&state.pool, &input).await?;
    tracing::info!(gamble_id = gamble.id, user_id = user.user_id, "Gamble created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: gamble })))
}

/// PUT /api/v1/gambles/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGamble>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let existing = GambleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Gamble", id))?;
    validate_chapter_range(
        input.chapter_number.or(existing.chapter_number),
        input.end_chapter.or(existing.end_chapter),
    )?;

    let gamble = GambleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Gamble", id))?;
    tracing::info!(gamble_id = id, user_id = user.user_id, "Gamble updated");
    Ok(Json(DataResponse { data: gamble }))
}

/// DELETE /api/v1/gambles/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !GambleRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Gamble", id));
    }
    tracing::info!(gamble_id = id, user_id = user.user_id, "Gamble deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// GET /api/v1/gambles/{id}/teams
pub async fn list_teams(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = load_detail(&state, &reader, id).await?;
    Ok(Json(DataResponse {
        data: detail.item.teams,
    }))
}

/// POST /api/v1/gambles/{id}/teams
pub async fn create_team(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateGambleTeam>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_gamble_exists(&state, id).await?;
    let team = GambleRepo::create_team(&state.pool, id, &input).await?;
    tracing::info!(gamble_id = id, team_id = team.id, user_id = user.user_id, "Gamble team created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: team })))
}

/// PUT /api/v1/gambles/{id}/teams/{team_id}
pub async fn update_team(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((id, team_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateGambleTeam>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let team = GambleRepo::update_team(&state.pool, id, team_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("GambleTeam", team_id))?;
    tracing::info!(gamble_id = id, team_id, user_id = user.user_id, "Gamble team updated");
    Ok(Json(DataResponse { data: team }))
}

/// DELETE /api/v1/gambles/{id}/teams/{team_id}
pub async fn delete_team(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((id, team_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !GambleRepo::delete_team(&state.pool, id, team_id).await? {
        return Err(AppError::not_found("GambleTeam", team_id));
    }
    tracing::info!(gamble_id = id, team_id, user_id = user.user_id, "Gamble team deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

/// GET /api/v1/gambles/{id}/rounds
pub async fn list_rounds(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = load_detail(&state, &reader, id).await?;
    Ok(Json(DataResponse {
        data: detail.item.rounds,
    }))
}

/// POST /api/v1/gambles/{id}/rounds
pub async fn create_round(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateGambleRound>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_gamble_exists(&state, id).await?;
    if let Some(team_id) = input.winner_team_id {
        ensure_team_in_gamble(&state, id, team_id).await?;
    }
    let round = GambleRepo::create_round(&state.pool, id, &input).await?;
    tracing::info!(gamble_id = id, round_id = round.id, user_id = user.user_id, "Gamble round created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: round })))
}

/// PUT /api/v1/gambles/{id}/rounds/{round_id}
pub async fn update_round(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((id, round_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateGambleRound>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(team_id) = input.winner_team_id {
        ensure_team_in_gamble(&state, id, team_id).await?;
    }
    let round = GambleRepo::update_round(&state.pool, id, round_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("GambleRound", round_id))?;
    tracing::info!(gamble_id = id, round_id, user_id = user.user_id, "Gamble round updated");
    Ok(Json(DataResponse { data: round }))
}

/// DELETE /api/v1/gambles/{id}/rounds/{round_id}
pub async fn delete_round(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((id, round_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !GambleRepo::delete_round(&state.pool, id, round_id).await? {
        return Err(AppError::not_found("GambleRound", round_id));
    }
    tracing::info!(gamble_id = id, round_id, user_id = user.user_id, "Gamble round deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_detail(
    state: &AppState,
    reader: &Reader,
    id: DbId,
) -> AppResult<Gated<GambleDetail>> {
    let gamble = GambleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Gamble", id))?;
    let teams = GambleRepo::list_teams(&state.pool, id).await?;
    let rounds = GambleRepo::list_rounds(&state.pool, id).await?;
    reader
        .present_one(
            &state.pool,
            TranslatableEntity::Gamble,
            GambleDetail {
                gamble,
                teams,
                rounds,
            },
        )
        .await
}

async fn ensure_gamble_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if GambleRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Gamble", id))
    }
}

/// A round's winner must be one of the gamble's own teams.
async fn ensure_team_in_gamble(state: &AppState, gamble_id: DbId, team_id: DbId) -> AppResult<()> {
    GambleRepo::find_team(&state.pool, gamble_id, team_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::validation(format!(
            "Team {team_id} does not belong to gamble {gamble_id}"
        )))
}
