//! Handlers for the `/characters` resource and its sub-resources.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::event::EventStatus;
use usogui_core::language::TranslatableEntity;
use usogui_core::types::DbId;
use usogui_db::models::character::{
    CharacterFilter, CreateCharacter, SetCharacterFactions, UpdateCharacter,
};
use usogui_db::models::event::EventFilter;
use usogui_db::models::gamble::GambleFilter;
use usogui_db::models::quote::QuoteFilter;
use usogui_db::repositories::{CharacterRepo, EventRepo, GambleRepo, QuoteRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::middleware::reader::Reader;
use crate::query::{PaginationParams, SearchParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CharacterListParams {
    pub faction_id: Option<DbId>,
    pub arc_id: Option<DbId>,
}

/// GET /api/v1/characters
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<CharacterListParams>,
    Query(search): Query<SearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let filter = CharacterFilter {
        search: search.term().map(str::to_string),
        faction_id: params.faction_id,
        arc_id: params.arc_id,
        max_chapter: reader.gate.max_chapter(),
    };
    let (characters, total) = CharacterRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Character, characters)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Character", id))?;
    let data = reader
        .present_one(&state.pool, TranslatableEntity::Character, character)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/characters
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let character = CharacterRepo::create(&state.pool, &input).await?;
    tracing::info!(character_id = character.id, user_id = user.user_id, "Character created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

/// PUT /api/v1/characters/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let character = CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Character", id))?;
    tracing::info!(character_id = id, user_id = user.user_id, "Character updated");
    Ok(Json(DataResponse { data: character }))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CharacterRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Character", id));
    }
    tracing::info!(character_id = id, user_id = user.user_id, "Character deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Sub-resources
// ---------------------------------------------------------------------------

/// GET /api/v1/characters/{id}/gambles
pub async fn list_gambles(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    ensure_character_exists(&state, id).await?;
    let page = page.page_request();
    let filter = GambleFilter {
        character_id: Some(id),
        ..GambleFilter::default()
    };
    let (gambles, total) = GambleRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Gamble, gambles)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/characters/{id}/events
///
/// Approved events only.
pub async fn list_events(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    ensure_character_exists(&state, id).await?;
    let page = page.page_request();
    let filter = EventFilter {
        character_id: Some(id),
        status: Some(EventStatus::Approved.as_str().to_string()),
        ..EventFilter::default()
    };
    let (events, total) = EventRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Event, events)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/characters/{id}/quotes
pub async fn list_quotes(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    ensure_character_exists(&state, id).await?;
    let page = page.page_request();
    let filter = QuoteFilter {
        character_id: Some(id),
        ..QuoteFilter::default()
    };
    let (quotes, total) = QuoteRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(PaginatedResponse::new(
        reader.gate.apply_all(quotes),
        page,
        total,
    )))
}

/// GET /api/v1/characters/{id}/factions
pub async fn list_factions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_character_exists(&state, id).await?;
    let factions = CharacterRepo::list_factions(&state.pool, id).await?;
    Ok(Json(DataResponse { data: factions }))
}

/// PUT /api/v1/characters/{id}/factions
///
/// Replaces every membership of the character.
pub async fn set_factions(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetCharacterFactions>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_character_exists(&state, id).await?;
    let factions = CharacterRepo::set_factions(&state.pool, id, &input.factions).await?;
    tracing::info!(
        character_id = id,
        factions = factions.len(),
        user_id = user.user_id,
        "Character factions replaced"
    );
    Ok(Json(DataResponse { data: factions }))
}

async fn ensure_character_exists(state: &AppState, id: DbId) -> AppResult<()> {
    if CharacterRepo::exists(&state.pool, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Character", id))
    }
}
