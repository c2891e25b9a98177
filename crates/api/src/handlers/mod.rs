//! HTTP request handlers, one module per resource.

pub mod arcs;
pub mod auth;
pub mod chapters;
pub mod characters;
pub mod events;
pub mod factions;
pub mod gambles;
pub mod guides;
pub mod media;
pub mod quotes;
pub mod search;
pub mod series;
pub mod tags;
pub mod translations;
pub mod users;
pub mod volumes;
