//! Handlers for the `/users` resource: public profiles, the caller's own
//! settings, and admin role management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use usogui_core::roles::Role;
use usogui_core::types::DbId;
use usogui_core::validation::{validate_password_strength, MIN_PASSWORD_LEN};
use usogui_db::models::user::{
    ChangePassword, PublicUser, UpdateProfile, UpdateProgress, UpdateRole, UserResponse,
};
use usogui_db::repositories::{GambleRepo, QuoteRepo, SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, SearchParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
    Query(search): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let page = page.page_request();
    let (users, total) = UserRepo::list(&state.pool, search.term(), page).await?;
    let data = users.into_iter().map(PublicUser::from).collect();
    Ok(Json(PaginatedResponse::new(data, page, total)))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(DataResponse {
        data: PublicUser::from(user),
    }))
}

/// PUT /api/v1/users/me/progress
pub async fn update_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProgress>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let user = UserRepo::update_progress(&state.pool, auth.user_id, input.user_progress)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    tracing::info!(
        user_id = auth.user_id,
        user_progress = input.user_progress,
        "Reading progress updated"
    );
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/me/profile
///
/// Replaces both favorites; send `null` to clear one.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(quote_id) = input.favorite_quote_id {
        QuoteRepo::find_by_id(&state.pool, quote_id)
            .await?
            .ok_or_else(|| AppError::not_found("Quote", quote_id))?;
    }
    if let Some(gamble_id) = input.favorite_gamble_id {
        if !GambleRepo::exists(&state.pool, gamble_id).await? {
            return Err(AppError::not_found("Gamble", gamble_id));
        }
    }

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    tracing::info!(user_id = auth.user_id, "Profile updated");
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/users/me/password
///
/// Changing the password signs out every other session.
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePassword>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    let current_ok = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_ok {
        return Err(AppError::unauthorized("Current password is incorrect"));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LEN)
        .map_err(AppError::validation)?;

    let hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, auth.user_id, &hash).await?;
    SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/users/{id}/role
pub async fn update_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<impl IntoResponse> {
    let role = Role::from_str_db(&input.role)?;
    if id == admin.user_id && role != Role::Admin {
        return Err(AppError::BadRequest(
            "Admins cannot demote themselves".into(),
        ));
    }

    let user = UserRepo::update_role(&state.pool, id, role)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(
        user_id = id,
        role = role.as_str(),
        admin_id = admin.user_id,
        "User role changed"
    );
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Deactivates the account and revokes its sessions.
pub async fn deactivate(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "Admins cannot deactivate their own account".into(),
        ));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::not_found("User", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
