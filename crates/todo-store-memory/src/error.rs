//! Error types for in-memory store operations.

use thiserror::Error;

/// Errors that can occur during `MemoryStore` operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A writer panicked while holding the lock; the map may be half-updated.
    #[error("Store lock poisoned during {operation}")]
    LockPoisoned {
        /// Operation that observed the poisoned lock.
        operation: &'static str,
    },
}
