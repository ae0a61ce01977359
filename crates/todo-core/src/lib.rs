//! Domain types, querying and metrics for the todo tracker.

/// Time sources.
pub mod clock;
/// Identifier types.
pub mod id;
/// Completion-time aggregation.
pub mod metrics;
/// Priority levels and their ordering.
pub mod priority;
/// Filter, sort and pagination over todo collections.
pub mod query;
/// Case-insensitive text search.
pub mod text_matcher;

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::id::TodoId;
pub use crate::metrics::CompletionMetrics;
pub use crate::priority::{ParsePriorityError, Priority};
pub use crate::query::{
    Page, PageRequest, SortDirection, SortKey, SortOrder, SortSpec, TodoFilter, TodoQuery,
};

use std::fmt;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Maximum length of a todo text, in characters, after trimming.
pub const MAX_TEXT_CHARS: usize = 120;

/// Reasons a todo text is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TextError {
    /// Nothing left after trimming.
    #[error("text must not be empty")]
    Empty,
    /// Longer than [`MAX_TEXT_CHARS`].
    #[error("text must not exceed {max} characters (got {len})", max = MAX_TEXT_CHARS)]
    TooLong {
        /// Character count after trimming.
        len: usize,
    },
}

/// Trimmed, non-empty todo text of at most [`MAX_TEXT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TodoText(String);

impl TodoText {
    /// Trim and validate raw input.
    ///
    /// # Errors
    /// Returns [`TextError`] when the trimmed text is empty or too long.
    pub fn parse(raw: &str) -> Result<Self, TextError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let len = trimmed.chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(TextError::TooLong { len });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion status of a todo.
///
/// The completion instant only exists in the `Done` state, so "done iff
/// doneDate is set" holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoneState {
    /// Not completed yet.
    #[default]
    Pending,
    /// Completed at the given instant.
    Done {
        /// When the item was marked done.
        at: OffsetDateTime,
    },
}

impl DoneState {
    /// Whether the item is completed.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done { .. })
    }

    /// Completion instant, if completed.
    #[must_use]
    pub const fn done_at(self) -> Option<OffsetDateTime> {
        match self {
            Self::Pending => None,
            Self::Done { at } => Some(at),
        }
    }
}

/// A single tracked task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    /// What needs doing.
    pub text: TodoText,
    /// Urgency.
    pub priority: Priority,
    /// Optional deadline.
    pub due_date: Option<OffsetDateTime>,
    state: DoneState,
    created_at: OffsetDateTime,
}

impl Todo {
    /// Create a pending todo with a fresh identifier.
    #[must_use]
    pub fn new(
        text: TodoText,
        priority: Priority,
        due_date: Option<OffsetDateTime>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id: TodoId::new(),
            text,
            priority,
            due_date,
            state: DoneState::Pending,
            created_at,
        }
    }

    /// Identifier, fixed at creation.
    #[must_use]
    pub const fn id(&self) -> TodoId {
        self.id
    }

    /// Creation instant, fixed at creation.
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Current completion status.
    #[must_use]
    pub const fn state(&self) -> DoneState {
        self.state
    }

    /// Shorthand for `state().is_done()`.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Shorthand for `state().done_at()`.
    #[must_use]
    pub const fn done_at(&self) -> Option<OffsetDateTime> {
        self.state.done_at()
    }

    /// Transition to done. Returns `false` (and changes nothing) when already done.
    ///
    /// The completion instant never precedes the creation instant.
    pub fn mark_done(&mut self, now: OffsetDateTime) -> bool {
        if self.state.is_done() {
            return false;
        }
        self.state = DoneState::Done {
            at: now.max(self.created_at),
        };
        true
    }

    /// Transition back to pending. Returns `false` when already pending.
    pub fn mark_undone(&mut self) -> bool {
        if !self.state.is_done() {
            return false;
        }
        self.state = DoneState::Pending;
        true
    }

    /// Time between creation and completion, if completed.
    #[must_use]
    pub fn completion_time(&self) -> Option<Duration> {
        self.state.done_at().map(|at| at - self.created_at)
    }
}
