//! Domain logic for the Usogui content database.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` and `api`
//! crates build on these types and rules.

pub mod cache;
pub mod error;
pub mod event;
pub mod guide;
pub mod language;
pub mod media;
pub mod pagination;
pub mod roles;
pub mod spoiler;
pub mod tag;
pub mod types;
pub mod validation;
