//! Usogui API server library.
//!
//! Exposes config, state, error handling, auth, the media resolver, and the
//! route tree so the binary entrypoint and integration tests build the same
//! application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod media_resolver;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
