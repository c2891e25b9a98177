//! Handlers for the `/tags` resource and entity tagging.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use usogui_core::tag::TaggableEntity;
use usogui_core::types::DbId;
use usogui_core::validation::normalize_tag_name;
use usogui_db::models::tag::{CreateTag, SetEntityTags, UpdateTag};
use usogui_db::repositories::TagRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let (tags, total) = TagRepo::list(&state.pool, page).await?;
    Ok(Json(PaginatedResponse::new(tags, page, total)))
}

/// GET /api/v1/tags/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Tag", id))?;
    Ok(Json(DataResponse { data: tag }))
}

/// POST /api/v1/tags
///
/// Names are stored lowercased and trimmed, so `Cheating` and ` cheating`
/// collide on the unique constraint.
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let name = normalize_tag_name(&input.name)?;
    let tag = TagRepo::create(&state.pool, &name, input.description.as_deref()).await?;
    tracing::info!(tag_id = tag.id, name = %tag.name, user_id = user.user_id, "Tag created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// PUT /api/v1/tags/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let name = input.name.as_deref().map(normalize_tag_name).transpose()?;
    let tag = TagRepo::update(&state.pool, id, name.as_deref(), input.description.as_deref())
        .await?
        .ok_or_else(|| AppError::not_found("Tag", id))?;
    tracing::info!(tag_id = id, user_id = user.user_id, "Tag updated");
    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/tags/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TagRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Tag", id));
    }
    tracing::info!(tag_id = id, user_id = user.user_id, "Tag deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/tags/entity/{entity_type}/{entity_id}
pub async fn list_for_entity(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let entity = resolve_entity(&state, &entity_type, entity_id).await?;
    let tags = TagRepo::list_for_entity(&state.pool, entity, entity_id).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// PUT /api/v1/tags/entity/{entity_type}/{entity_id}
///
/// Replaces the entity's tags with exactly `tag_ids`.
pub async fn set_for_entity(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, DbId)>,
    Json(input): Json<SetEntityTags>,
) -> AppResult<impl IntoResponse> {
    let entity = resolve_entity(&state, &entity_type, entity_id).await?;
    let tags = TagRepo::set_for_entity(&state.pool, entity, entity_id, &input.tag_ids).await?;
    tracing::info!(
        entity_type = entity.as_str(),
        entity_id,
        tags = tags.len(),
        user_id = user.user_id,
        "Entity tags replaced"
    );
    Ok(Json(DataResponse { data: tags }))
}

async fn resolve_entity(
    state: &AppState,
    entity_type: &str,
    entity_id: DbId,
) -> AppResult<TaggableEntity> {
    let entity = TaggableEntity::from_str_db(entity_type)?;
    if !TagRepo::entity_exists(&state.pool, entity, entity_id).await? {
        return Err(AppError::not_found(entity.label(), entity_id));
    }
    Ok(entity)
}
