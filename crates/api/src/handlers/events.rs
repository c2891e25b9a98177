//! Handlers for the `/events` resource.
//!
//! Events written by editors wait for a moderator's approval; the public
//! only ever sees approved events.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::event::{EventStatus, EventType};
use usogui_core::language::TranslatableEntity;
use usogui_core::types::DbId;
use usogui_db::models::event::{CreateEvent, EventFilter, SetEventCharacters, UpdateEvent};
use usogui_db::repositories::EventRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireEditor, RequireModerator};
use crate::middleware::reader::Reader;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventListParams {
    pub arc_id: Option<DbId>,
    pub gamble_id: Option<DbId>,
    pub character_id: Option<DbId>,
    pub event_type: Option<String>,
    /// Honoured for moderators only; everyone else sees approved events.
    pub status: Option<String>,
}

/// GET /api/v1/events
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<EventListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let event_type = params
        .event_type
        .as_deref()
        .map(EventType::from_str_db)
        .transpose()?;
    let is_moderator = reader.user.is_some_and(|u| u.role.is_moderator());
    let status = match params.status.as_deref() {
        Some(s) if is_moderator => EventStatus::from_str_db(s)?,
        _ => EventStatus::Approved,
    };

    let page = page.page_request();
    let filter = EventFilter {
        arc_id: params.arc_id,
        gamble_id: params.gamble_id,
        character_id: params.character_id,
        event_type: event_type.map(|t| t.as_str().to_string()),
        status: Some(status.as_str().to_string()),
    };
    let (events, total) = EventRepo::list(&state.pool, &filter, page).await?;
    let data = reader
        .present(&state.pool, TranslatableEntity::Event, events)
        .await?;
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/events/{id}
///
/// Unapproved events are visible to their creator and moderators only.
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|e| {
            e.status == EventStatus::Approved.as_str()
                || reader.user.is_some_and(|u| u.owns_or_moderates(e.created_by))
        })
        .ok_or_else(|| AppError::not_found("Event", id))?;
    let data = reader
        .present_one(&state.pool, TranslatableEntity::Event, event)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/events
pub async fn create(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let event_type = match input.event_type.as_deref() {
        Some(t) => EventType::from_str_db(t)?,
        None => EventType::Decision,
    };
    let status = EventStatus::initial_for(user.role);

    let event = EventRepo::create(&state.pool, &input, event_type, status, user.user_id).await?;
    tracing::info!(
        event_id = event.id,
        status = status.as_str(),
        user_id = user.user_id,
        "Event created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let event_type = input
        .event_type
        .as_deref()
        .map(EventType::from_str_db)
        .transpose()?;
    let event = EventRepo::update(&state.pool, id, &input, event_type)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    tracing::info!(event_id = id, user_id = user.user_id, "Event updated");
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !EventRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Event", id));
    }
    tracing::info!(event_id = id, user_id = user.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/events/{id}/approve
pub async fn approve(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    EventStatus::from_str_db(&event.status)?.ensure_approvable()?;

    if !EventRepo::approve(&state.pool, id).await? {
        return Err(AppError::conflict("Event was approved concurrently"));
    }
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    tracing::info!(event_id = id, user_id = user.user_id, "Event approved");
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/events/{id}/characters
pub async fn set_characters(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetEventCharacters>,
) -> AppResult<impl IntoResponse> {
    EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    EventRepo::set_characters(&state.pool, id, &input.character_ids).await?;
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", id))?;
    tracing::info!(
        event_id = id,
        characters = input.character_ids.len(),
        user_id = user.user_id,
        "Event characters replaced"
    );
    Ok(Json(DataResponse { data: event }))
}
