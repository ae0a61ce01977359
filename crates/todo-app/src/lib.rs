//! Application layer for the todo server.
//!
//! This crate holds the service façade, its error taxonomy, the storage seam
//! and the TOML configuration shared by the HTTP binary and tests.

pub mod config;
pub mod error;
pub mod service;
pub mod store;

pub use config::{LoggingConfig, ListenConfig, PaginationConfig, ServerConfig};
pub use error::{FieldViolation, TodoError, TodoResult, Violations, parse_id};
pub use service::{CreateTodoInput, DueDatePatch, TodoService, UpdateTodoInput};
pub use store::TodoStore;
