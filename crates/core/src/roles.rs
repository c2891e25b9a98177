//! User roles and their privilege ordering.
//!
//! The names must match the CHECK constraint on `users.role` in
//! `20260101000001_create_users.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names, lowest privilege first.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_EDITOR, ROLE_MODERATOR, ROLE_ADMIN];

/// A user's role. Variants are declared in ascending privilege order so the
/// derived `Ord` matches the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Editor,
    Moderator,
    Admin,
}

impl Role {
    /// Parse a role name as stored in the database or sent by a client.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_USER => Ok(Self::User),
            ROLE_EDITOR => Ok(Self::Editor),
            ROLE_MODERATOR => Ok(Self::Moderator),
            ROLE_ADMIN => Ok(Self::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{s}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Editor => ROLE_EDITOR,
            Self::Moderator => ROLE_MODERATOR,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Whether this role grants at least the privileges of `min`.
    pub fn at_least(self, min: Role) -> bool {
        self >= min
    }

    /// Whether this role may moderate community submissions.
    pub fn is_moderator(self) -> bool {
        self.at_least(Role::Moderator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_is_ordered() {
        assert!(Role::Admin.at_least(Role::Moderator));
        assert!(Role::Moderator.at_least(Role::Editor));
        assert!(Role::Editor.at_least(Role::User));
        assert!(!Role::Editor.at_least(Role::Moderator));
        assert!(!Role::User.at_least(Role::Editor));
        assert!(Role::User.at_least(Role::User));
    }

    #[test]
    fn round_trips_through_db_names() {
        for name in VALID_ROLES {
            let role = Role::from_str_db(name).unwrap();
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn rejects_unknown_role() {
        let err = Role::from_str_db("superuser").unwrap_err();
        assert!(err.to_string().contains("Invalid role 'superuser'"));
    }

    #[test]
    fn only_moderators_and_admins_moderate() {
        assert!(!Role::User.is_moderator());
        assert!(!Role::Editor.is_moderator());
        assert!(Role::Moderator.is_moderator());
        assert!(Role::Admin.is_moderator());
    }
}
