//! In-memory storage for todo items.
//!
//! Everything lives in a single `RwLock`-guarded map; nothing survives a restart.

mod error;

pub use error::StoreError;

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use todo_core::{Todo, TodoId};
use tracing::{debug, trace};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Concurrency-safe map from [`TodoId`] to [`Todo`].
///
/// Each call takes the lock once, so single-record reads and writes are
/// atomic. Sequences of calls are not: callers doing load-modify-save get
/// last-writer-wins semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: RwLock<HashMap<TodoId, Todo>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, HashMap<TodoId, Todo>>> {
        self.todos
            .read()
            .map_err(|_| StoreError::LockPoisoned { operation })
    }

    fn write(&self, operation: &'static str) -> Result<RwLockWriteGuard<'_, HashMap<TodoId, Todo>>> {
        self.todos
            .write()
            .map_err(|_| StoreError::LockPoisoned { operation })
    }

    /// Insert or replace a todo, returning the previous version if any.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn put(&self, todo: Todo) -> Result<Option<Todo>> {
        let id = todo.id();
        let previous = self.write("put")?.insert(id, todo);
        debug!(%id, replaced = previous.is_some(), "stored todo");
        Ok(previous)
    }

    /// Fetch a copy of a todo.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let found = self.read("get")?.get(&id).cloned();
        trace!(%id, found = found.is_some(), "looked up todo");
        Ok(found)
    }

    /// Remove a todo. Returns `true` when something was removed.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn delete(&self, id: TodoId) -> Result<bool> {
        let removed = self.write("delete")?.remove(&id).is_some();
        debug!(%id, removed, "deleted todo");
        Ok(removed)
    }

    /// Check presence without cloning the record.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn exists(&self, id: TodoId) -> Result<bool> {
        Ok(self.read("exists")?.contains_key(&id))
    }

    /// Snapshot every todo. Order is unspecified.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn list_all(&self) -> Result<Vec<Todo>> {
        let todos: Vec<Todo> = self.read("list_all")?.values().cloned().collect();
        trace!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    /// Number of stored todos.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read("len")?.len())
    }

    /// Whether the store is empty.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read("is_empty")?.is_empty())
    }
}
