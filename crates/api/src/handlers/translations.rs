//! Handlers for `/translations/{entity_type}/{entity_id}`.
//!
//! English is the canonical text stored on the entity itself, so it cannot
//! be written or deleted through these routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use usogui_core::language::{Language, TranslatableEntity};
use usogui_core::types::DbId;
use usogui_db::models::translation::UpsertTranslation;
use usogui_db::repositories::TranslationRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/translations/{entity_type}/{entity_id}
pub async fn list(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let entity = resolve_entity(&state, &entity_type, entity_id).await?;
    let translations = TranslationRepo::list_for_entity(&state.pool, entity, entity_id).await?;
    Ok(Json(DataResponse { data: translations }))
}

/// GET /api/v1/translations/{entity_type}/{entity_id}/{lang}
pub async fn get_one(
    State(state): State<AppState>,
    Path((entity_type, entity_id, lang)): Path<(String, DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let entity = resolve_entity(&state, &entity_type, entity_id).await?;
    let language = parse_language(&lang)?;
    let translation = TranslationRepo::find(&state.pool, entity, entity_id, language)
        .await?
        .ok_or_else(|| AppError::not_found("Translation", entity_id))?;
    Ok(Json(DataResponse { data: translation }))
}

/// PUT /api/v1/translations/{entity_type}/{entity_id}/{lang}
pub async fn upsert(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((entity_type, entity_id, lang)): Path<(String, DbId, String)>,
    Json(input): Json<UpsertTranslation>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let entity = resolve_entity(&state, &entity_type, entity_id).await?;
    let language = writable_language(&lang)?;
    if input.name.is_none() && input.description.is_none() {
        return Err(AppError::validation(
            "A translation needs a name or a description",
        ));
    }

    let translation =
        TranslationRepo::upsert(&state.pool, entity, entity_id, language, &input).await?;
    tracing::info!(
        entity_type = entity.as_str(),
        entity_id,
        language = language.as_str(),
        user_id = user.user_id,
        "Translation saved"
    );
    Ok(Json(DataResponse { data: translation }))
}

/// DELETE /api/v1/translations/{entity_type}/{entity_id}/{lang}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path((entity_type, entity_id, lang)): Path<(String, DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let entity = resolve_entity(&state, &entity_type, entity_id).await?;
    let language = writable_language(&lang)?;
    if !TranslationRepo::delete(&state.pool, entity, entity_id, language).await? {
        return Err(AppError::not_found("Translation", entity_id));
    }
    tracing::info!(
        entity_type = entity.as_str(),
        entity_id,
        language = language.as_str(),
        user_id = user.user_id,
        "Translation deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

async fn resolve_entity(
    state: &AppState,
    entity_type: &str,
    entity_id: DbId,
) -> AppResult<TranslatableEntity> {
    let entity = TranslatableEntity::from_str_db(entity_type)?;
    if !TranslationRepo::entity_exists(&state.pool, entity, entity_id).await? {
        return Err(AppError::not_found(entity.label(), entity_id));
    }
    Ok(entity)
}

fn parse_language(code: &str) -> AppResult<Language> {
    Ok(Language::from_code(code)?)
}

fn writable_language(code: &str) -> AppResult<Language> {
    let language = parse_language(code)?;
    if language.is_canonical() {
        return Err(AppError::validation(
            "English text lives on the entity itself; edit the entity instead",
        ));
    }
    Ok(language)
}
