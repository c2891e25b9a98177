//! Handlers for the `/media` resource.
//!
//! Media rows hold links only. Submissions are classified and enriched by
//! the [`MediaResolver`](crate::media_resolver::MediaResolver) before they
//! are stored, then wait in the moderation queue unless a moderator sent
//! them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use usogui_core::media::{
    validate_rejection_reason, MediaOwnerType, MediaPurpose, MediaStatus, MediaType,
};
use usogui_core::types::DbId;
use usogui_db::models::guide::RejectRequest;
use usogui_db::models::media::{CreateMedia, Media, MediaFilter, SubmitMedia};
use usogui_db::repositories::MediaRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireModerator;
use crate::middleware::reader::Reader;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MediaListParams {
    pub owner_type: Option<String>,
    pub owner_id: Option<DbId>,
    pub media_type: Option<String>,
    pub purpose: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub url: String,
}

/// GET /api/v1/media
///
/// Approved media only.
pub async fn list(
    State(state): State<AppState>,
    reader: Reader,
    Query(params): Query<MediaListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let mut filter = parse_filter(&params)?;
    filter.status = Some(MediaStatus::Approved.as_str().to_string());

    let page = page.page_request();
    let (media, total) = MediaRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(PaginatedResponse::new(
        reader.gate.apply_all(media),
        page,
        total,
    )))
}

/// GET /api/v1/media/pending
///
/// The moderation queue.
pub async fn list_pending(
    RequireModerator(_): RequireModerator,
    State(state): State<AppState>,
    Query(params): Query<MediaListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let mut filter = parse_filter(&params)?;
    filter.status = Some(MediaStatus::Pending.as_str().to_string());

    let page = page.page_request();
    let (media, total) = MediaRepo::list(&state.pool, &filter, page).await?;
    Ok(Json(PaginatedResponse::new(media, page, total)))
}

/// GET /api/v1/media/{id}
///
/// Unapproved media are visible to their submitter and moderators only.
pub async fn get_by_id(
    State(state): State<AppState>,
    reader: Reader,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|m| {
            m.status == MediaStatus::Approved.as_str()
                || reader.user.is_some_and(|u| u.owns_or_moderates(m.submitted_by))
        })
        .ok_or_else(|| AppError::not_found("Media", id))?;
    Ok(Json(DataResponse {
        data: reader.gate.apply(media),
    }))
}

/// GET /api/v1/media/resolve?url=
///
/// Preview what a submission of `url` would be stored as.
pub async fn resolve(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> AppResult<impl IntoResponse> {
    let resolved = state.media_resolver.resolve(&params.url).await?;
    Ok(Json(DataResponse { data: resolved }))
}

/// POST /api/v1/media
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitMedia>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let owner_type = MediaOwnerType::from_str_db(&input.owner_type)?;
    if !MediaRepo::owner_exists(&state.pool, owner_type, input.owner_id).await? {
        return Err(AppError::validation(format!(
            "No {} with id {}",
            owner_type.as_str(),
            input.owner_id
        )));
    }

    let resolved = state.media_resolver.resolve(&input.url).await?;

    let media_type = match input.media_type.as_deref() {
        Some(t) => MediaType::from_str_db(t)?,
        None => resolved.media_type.ok_or_else(|| {
            AppError::validation("media_type is required when it cannot be inferred from the URL")
        })?,
    };
    let purpose = match input.purpose.as_deref() {
        Some(p) => MediaPurpose::from_str_db(p)?,
        None => MediaPurpose::Gallery,
    };
    let status = MediaStatus::initial_for(auth.role);

    let media = MediaRepo::create(
        &state.pool,
        &CreateMedia {
            url: resolved.url,
            media_type: media_type.as_str().to_string(),
            status: status.as_str().to_string(),
            purpose: purpose.as_str().to_string(),
            owner_type: owner_type.as_str().to_string(),
            owner_id: input.owner_id,
            chapter_number: input.chapter_number,
            title: input.title.or(resolved.title),
            description: input.description,
            thumbnail_url: resolved.thumbnail_url,
            platform: Some(resolved.platform.as_str().to_string()),
            submitted_by: Some(auth.user_id),
        },
    )
    .await?;

    tracing::info!(
        media_id = media.id,
        owner_type = owner_type.as_str(),
        owner_id = input.owner_id,
        status = status.as_str(),
        user_id = auth.user_id,
        "Media submitted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: media })))
}

/// POST /api/v1/media/{id}/approve
pub async fn approve(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    review(&state, user, id, MediaStatus::Approved, None).await
}

/// POST /api/v1/media/{id}/reject
pub async fn reject(
    RequireModerator(user): RequireModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<impl IntoResponse> {
    validate_rejection_reason(&input.reason)?;
    review(&state, user, id, MediaStatus::Rejected, Some(input.reason.trim())).await
}

/// DELETE /api/v1/media/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Media", id))?;
    if !auth.owns_or_moderates(media.submitted_by) {
        return Err(AppError::forbidden(
            "Only the submitter or a moderator can delete this media",
        ));
    }

    if !MediaRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Media", id));
    }
    tracing::info!(media_id = id, user_id = auth.user_id, "Media deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate the enum-valued query parameters before they reach SQL.
fn parse_filter(params: &MediaListParams) -> AppResult<MediaFilter> {
    let owner_type = params
        .owner_type
        .as_deref()
        .map(MediaOwnerType::from_str_db)
        .transpose()?;
    let media_type = params
        .media_type
        .as_deref()
        .map(MediaType::from_str_db)
        .transpose()?;
    let purpose = params
        .purpose
        .as_deref()
        .map(MediaPurpose::from_str_db)
        .transpose()?;
    Ok(MediaFilter {
        owner_type: owner_type.map(|t| t.as_str().to_string()),
        owner_id: params.owner_id,
        media_type: media_type.map(|t| t.as_str().to_string()),
        purpose: purpose.map(|p| p.as_str().to_string()),
        status: None,
    })
}

async fn review(
    state: &AppState,
    user: AuthUser,
    id: DbId,
    decision: MediaStatus,
    reason: Option<&str>,
) -> AppResult<Json<DataResponse<Media>>> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Media", id))?;
    MediaStatus::from_str_db(&media.status)?.ensure_reviewable()?;

    let media = MediaRepo::review(&state.pool, id, decision, user.user_id, reason)
        .await?
        .ok_or_else(|| AppError::conflict("Media was reviewed concurrently"))?;
    tracing::info!(
        media_id = id,
        decision = decision.as_str(),
        user_id = user.user_id,
        "Media reviewed"
    );
    Ok(Json(DataResponse { data: media }))
}
