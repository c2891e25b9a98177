//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access tokens and opaque refresh tokens.
//! - [`cookie`] -- The `refresh_token` cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
