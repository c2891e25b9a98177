//! Request extractors for authentication, authorization, and reader context.
//!
//! - [`auth::AuthUser`] -- Authenticated user from a JWT Bearer token.
//! - [`auth::OptionalAuthUser`] -- Same, but anonymous requests pass through.
//! - [`rbac::RequireEditor`], [`rbac::RequireModerator`], [`rbac::RequireAdmin`]
//!   -- Minimum-role guards.
//! - [`reader::Reader`] -- Spoiler gate and language for public reads.

pub mod auth;
pub mod rbac;
pub mod reader;
