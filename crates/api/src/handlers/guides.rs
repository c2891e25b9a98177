//! Handlers for the `/guides` resource and its publication workflow.
//!
//! Status changes go through [`GuideStatus::transition`] first and are then
//! written with a `WHERE status = <from>` guard, so two moderators acting on
//! the same guide cannot both succeed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::guide::{GuideAction, GuideActor, GuideStatus};
use usogui_core::media::validate_rejection_reason;
use usogui_core::types::DbId;
use usogui_db::models::guide::{
    CreateGuide, Guide, GuideFilter, GuideSort, RejectRequest, UpdateGuide,
};
use usogui_db::repositories::GuideRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::middleware::rbac::RequireModerator;
use crate::query::{PaginationParams, SearchParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GuideListParams {
    pub author_id: Option<DbId>,
    pub character_id: Option<DbId>,
    pub arc_id: Option<DbId>,
    /// `new` (default), `popular`, or `views`.
    pub sort: Option<String>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/guides
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GuideListParams>,
    Query(search): Query<SearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let filter = GuideFilter {
        search: search.term().map(str::to_string),
        author_id: params.author_id,
        character_id: params.character_id,
        arc_id: params.arc_id,
        status: Some(GuideStatus::Published),
        sort: GuideSort::from_param(params.sort.as_deref())?,
    };
    list_with(&state, &filter, page).await
}

/// GET /api/v1/guides/mine
///
/// The caller's guides in every status.
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let filter = GuideFilter {
        author_id: Some(auth.user_id),
        ..GuideFilter::default()
    };
    list_with(&state, &filter, page).await
}

/// GET /api/v1/guides/pending
pub async fn list_pending(
    RequireModerator(_): RequireModerator,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let filter = GuideFilter {
        status: Some(GuideStatus::Pending),
        ..GuideFilter::default()
    };
    list_with(&state, &filter, page).await
}

/// GET /api/v1/guides/{id}
///
/// Reading a published guide counts a view. Guides the caller may not see
/// are reported as missing.
pub async fn get_by_id(
    OptionalAuthUser(auth): OptionalAuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut guide = find_guide(&state, id).await?;
    let status = guide.status()?;
    let actor = auth.map(|a| a.actor());
    if !GuideActor::can_view(actor.as_ref(), guide.author_id, status) {
        return Err(AppError::not_found("Guide", id));
    }

    if status == GuideStatus::Published {
        GuideRepo::increment_view_count(&state.pool, id).await?;
        guide.view_count += 1;
    }
    Ok(Json(DataResponse { data: guide }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/guides
///
/// New guides start as drafts.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGuide>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let guide = GuideRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(guide_id = guide.id, user_id = auth.user_id, "Guide created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: guide })))
}

/// PUT /api/v1/guides/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGuide>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let guide = find_guide(&state, id).await?;
    auth.actor()
        .ensure_can_edit(guide.author_id, guide.status()?)?;

    let guide = GuideRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Guide", id))?;
    tracing::info!(guide_id = id, user_id = auth.user_id, "Guide updated");
    Ok(Json(DataResponse { data: guide }))
}

/// DELETE /api/v1/guides/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let guide = find_guide(&state, id).await?;
    auth.actor().ensure_can_delete(guide.author_id)?;

    if !GuideRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Guide", id));
    }
    tracing::info!(guide_id = id, user_id = auth.user_id, "Guide deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// POST /api/v1/guides/{id}/submit
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let guide = perform(&state, auth, id, GuideAction::Submit, None).await?;
    Ok(Json(DataResponse { data: guide }))
}

/// POST /api/v1/guides/{id}/approve
pub async fn approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let guide = perform(&state, auth, id, GuideAction::Approve, None).await?;
    Ok(Json(DataResponse { data: guide }))
}

/// POST /api/v1/guides/{id}/reject
pub async fn reject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<impl IntoResponse> {
    validate_rejection_reason(&input.reason)?;
    let reason = input.reason.trim();
    let guide = perform(&state, auth, id, GuideAction::Reject, Some(reason)).await?;
    Ok(Json(DataResponse { data: guide }))
}

/// POST /api/v1/guides/{id}/unpublish
pub async fn unpublish(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let guide = perform(&state, auth, id, GuideAction::Unpublish, None).await?;
    Ok(Json(DataResponse { data: guide }))
}

/// POST /api/v1/guides/{id}/like
///
/// Toggles the caller's like on a published guide.
pub async fn toggle_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let guide = find_guide(&state, id).await?;
    if guide.status()? != GuideStatus::Published {
        return Err(AppError::not_found("Guide", id));
    }
    let like = GuideRepo::toggle_like(&state.pool, id, auth.user_id).await?;
    tracing::debug!(guide_id = id, user_id = auth.user_id, liked = like.liked, "Guide like toggled");
    Ok(Json(DataResponse { data: like }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn list_with(
    state: &AppState,
    filter: &GuideFilter,
    page: PaginationParams,
) -> AppResult<Json<PaginatedResponse<Guide>>> {
    let page = page.page_request();
    let (guides, total) = GuideRepo::list(&state.pool, filter, page).await?;
    Ok(Json(PaginatedResponse::new(guides, page, total)))
}

async fn find_guide(state: &AppState, id: DbId) -> AppResult<Guide> {
    GuideRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Guide", id))
}

/// Check permission and the state machine, then apply the guarded update.
async fn perform(
    state: &AppState,
    auth: AuthUser,
    id: DbId,
    action: GuideAction,
    reason: Option<&str>,
) -> AppResult<Guide> {
    let guide = find_guide(state, id).await?;
    let from = guide.status()?;
    auth.actor().ensure_can_perform(guide.author_id, action)?;
    let to = from.transition(action)?;

    let guide = GuideRepo::transition(&state.pool, id, from, to, reason)
        .await?
        .ok_or_else(|| AppError::conflict("Guide status changed concurrently; reload and retry"))?;

    tracing::info!(
        guide_id = id,
        action = action.as_str(),
        from = from.as_str(),
        to = to.as_str(),
        user_id = auth.user_id,
        "Guide status changed"
    );
    Ok(guide)
}
