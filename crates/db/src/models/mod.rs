//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches
//! - Where the listing takes filters, a plain filter struct

pub mod arc;
pub mod chapter;
pub mod character;
pub mod event;
pub mod faction;
pub mod gamble;
pub mod guide;
pub mod media;
pub mod quote;
pub mod search;
pub mod series;
pub mod session;
pub mod tag;
pub mod translation;
pub mod user;
pub mod volume;
