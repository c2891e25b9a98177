//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use usogui_core::roles::Role;
use usogui_core::types::{ChapterNumber, DbId, Timestamp};
use usogui_core::validation::validate_username;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] or [`PublicUser`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub user_progress: ChapterNumber,
    pub favorite_quote_id: Option<DbId>,
    pub favorite_gamble_id: Option<DbId>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parsed role. Rows are constrained by `ck_users_role`, so an unknown
    /// value means the schema and code disagree; fall back to the least
    /// privileged role.
    pub fn role(&self) -> Role {
        Role::from_str_db(&self.role).unwrap_or(Role::User)
    }
}

/// The signed-in user's own view of their account.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub user_progress: ChapterNumber,
    pub favorite_quote_id: Option<DbId>,
    pub favorite_gamble_id: Option<DbId>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            is_active: u.is_active,
            user_progress: u.user_progress,
            favorite_quote_id: u.favorite_quote_id,
            favorite_gamble_id: u.favorite_gamble_id,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
        }
    }
}

/// What other readers see of a user: no email, no login metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: DbId,
    pub username: String,
    pub role: String,
    pub user_progress: ChapterNumber,
    pub favorite_quote_id: Option<DbId>,
    pub favorite_gamble_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            user_progress: u.user_progress,
            favorite_quote_id: u.favorite_quote_id,
            favorite_gamble_id: u.favorite_gamble_id,
            created_at: u.created_at,
        }
    }
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Registration payload as sent by clients.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProgress {
    #[validate(range(min = 0, message = "must be zero or a positive chapter number"))]
    pub user_progress: ChapterNumber,
}

/// Replaces both favorites; send `null` to clear one.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub favorite_quote_id: Option<DbId>,
    pub favorite_gamble_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRole {
    pub role: String,
}
