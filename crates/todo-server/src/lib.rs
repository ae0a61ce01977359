//! HTTP front end for the in-memory todo service.

pub mod api;

pub use api::{ApiError, AppState, router, routes};
