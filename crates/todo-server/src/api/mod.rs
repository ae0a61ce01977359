//! HTTP surface: routes, shared state and wire types.

pub mod dto;
pub mod error;
mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post, put};
use todo_app::TodoService;
use todo_app::config::{ListenConfig, PaginationConfig};
use todo_store_memory::MemoryStore;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TodoService<MemoryStore>>,
    pub pagination: PaginationConfig,
}

impl AppState {
    #[must_use]
    pub fn new(service: TodoService<MemoryStore>, pagination: PaginationConfig) -> Self {
        Self {
            service: Arc::new(service),
            pagination,
        }
    }
}

/// Routes without middleware; tests drive this directly.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route("/todos/metrics", get(handlers::metrics))
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/todos/{id}/done", post(handlers::mark_done))
        .route("/todos/{id}/undone", put(handlers::mark_undone))
        .with_state(state)
}

/// Full application: routes plus tracing, CORS and panic recovery.
///
/// # Errors
/// Returns an error when a configured CORS origin is not a valid header value.
pub fn router(state: AppState, listen: &ListenConfig) -> Result<Router> {
    Ok(routes(state)
        .layer(cors_layer(&listen.cors_origins)?)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim())
                .with_context(|| format!("invalid CORS origin '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}
