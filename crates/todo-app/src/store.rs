//! Storage abstraction consumed by [`crate::TodoService`].

use anyhow::Error;
use todo_core::{Todo, TodoId};
use todo_store_memory::{MemoryStore, StoreError};

/// Minimal storage abstraction required by the service layer.
pub trait TodoStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Insert or replace a todo.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn put(&self, todo: Todo) -> Result<(), Self::Error>;

    /// Load a single todo.
    ///
    /// # Errors
    /// Returns a store-specific error when the read fails.
    fn get(&self, id: TodoId) -> Result<Option<Todo>, Self::Error>;

    /// Remove a todo, reporting whether it existed.
    ///
    /// # Errors
    /// Returns a store-specific error when the write fails.
    fn delete(&self, id: TodoId) -> Result<bool, Self::Error>;

    /// Check if a todo exists without loading it.
    ///
    /// # Errors
    /// Returns a store-specific error when the check fails.
    fn exists(&self, id: TodoId) -> Result<bool, Self::Error>;

    /// Snapshot every stored todo, in no particular order.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    fn list_all(&self) -> Result<Vec<Todo>, Self::Error>;

    /// Number of stored todos.
    ///
    /// The default implementation counts [`list_all`](Self::list_all); stores
    /// can override it to avoid the copy.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    fn len(&self) -> Result<usize, Self::Error> {
        Ok(self.list_all()?.len())
    }
}

impl TodoStore for MemoryStore {
    type Error = StoreError;

    fn put(&self, todo: Todo) -> Result<(), Self::Error> {
        Self::put(self, todo).map(|_| ())
    }

    fn get(&self, id: TodoId) -> Result<Option<Todo>, Self::Error> {
        Self::get(self, id)
    }

    fn delete(&self, id: TodoId) -> Result<bool, Self::Error> {
        Self::delete(self, id)
    }

    fn exists(&self, id: TodoId) -> Result<bool, Self::Error> {
        Self::exists(self, id)
    }

    fn list_all(&self) -> Result<Vec<Todo>, Self::Error> {
        Self::list_all(self)
    }

    fn len(&self) -> Result<usize, Self::Error> {
        Self::len(self)
    }
}
