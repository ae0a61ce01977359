use std::sync::Arc;

use time::OffsetDateTime;
use todo_core::metrics::aggregate;
use todo_core::query::select;
use todo_core::{
    Clock, CompletionMetrics, Page, Priority, SystemClock, Todo, TodoId, TodoQuery, TodoText,
};
use tracing::{info, warn};

use crate::error::{TodoError, TodoResult, Violations};
use crate::store::TodoStore;

/// Fields accepted when creating a todo.
#[derive(Debug, Clone, Default)]
pub struct CreateTodoInput {
    /// Raw text; trimmed before validation.
    pub text: String,
    /// Priority token, matched case-insensitively. Required.
    pub priority: Option<String>,
    /// Optional due date.
    pub due_date: Option<OffsetDateTime>,
}

/// How an update treats the due date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DueDatePatch {
    /// Leave the stored value alone.
    #[default]
    Keep,
    /// Remove the due date.
    Clear,
    /// Overwrite with a new instant.
    Set(OffsetDateTime),
}

impl DueDatePatch {
    fn apply(self, current: Option<OffsetDateTime>) -> Option<OffsetDateTime> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(at) => Some(at),
        }
    }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTodoInput {
    /// Replacement text.
    pub text: Option<String>,
    /// Replacement priority token, matched case-insensitively.
    pub priority: Option<String>,
    /// Due date change.
    pub due_date: DueDatePatch,
}

/// Service façade over a [`TodoStore`].
///
/// Single store calls are atomic, but update and the done/undone transitions
/// are load-modify-save sequences: concurrent writers to the same id
/// interleave and the last writer wins.
pub struct TodoService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S> TodoService<S> {
    /// Service stamped by the wall clock.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Service stamped by an injected clock.
    #[must_use]
    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

impl<S: TodoStore> TodoService<S> {
    /// Validate and store a new todo.
    ///
    /// # Errors
    /// Returns [`TodoError::InvalidArgument`] for bad input or
    /// [`TodoError::Internal`] when the store fails.
    pub fn create(&self, input: CreateTodoInput) -> TodoResult<Todo> {
        let mut violations = Violations::new();
        let text = parse_text(&input.text, &mut violations);
        let priority = match input.priority.as_deref() {
            Some(raw) => parse_priority(raw, &mut violations),
            None => {
                violations.push("priority", "priority is required");
                None
            }
        };
        let (Some(text), Some(priority)) = (text, priority) else {
            warn!(%violations, "rejected todo creation");
            return Err(TodoError::InvalidArgument(violations));
        };

        let todo = Todo::new(text, priority, input.due_date, self.clock.now());
        self.store.put(todo.clone()).map_err(TodoError::internal)?;
        info!(id = %todo.id(), priority = %todo.priority, "created todo");
        Ok(todo)
    }

    /// Load one todo.
    ///
    /// # Errors
    /// Returns [`TodoError::NotFound`] when the id is unknown.
    pub fn get(&self, id: TodoId) -> TodoResult<Todo> {
        self.store
            .get(id)
            .map_err(TodoError::internal)?
            .ok_or(TodoError::NotFound(id))
    }

    /// Apply a partial update. Nothing is written if any field is invalid.
    ///
    /// # Errors
    /// Returns [`TodoError::NotFound`] before any validation takes place,
    /// then [`TodoError::InvalidArgument`] for bad fields.
    pub fn update(&self, id: TodoId, input: UpdateTodoInput) -> TodoResult<Todo> {
        let mut todo = self.get(id)?;

        let mut violations = Violations::new();
        let text = input
            .text
            .as_deref()
            .and_then(|raw| parse_text(raw, &mut violations));
        let priority = input
            .priority
            .as_deref()
            .and_then(|raw| parse_priority(raw, &mut violations));
        if !violations.is_empty() {
            warn!(%id, %violations, "rejected todo update");
        }
        violations.into_result()?;

        if let Some(text) = text {
            todo.text = text;
        }
        if let Some(priority) = priority {
            todo.priority = priority;
        }
        todo.due_date = input.due_date.apply(todo.due_date);

        self.store.put(todo.clone()).map_err(TodoError::internal)?;
        info!(%id, "updated todo");
        Ok(todo)
    }

    /// Remove a todo.
    ///
    /// # Errors
    /// Returns [`TodoError::NotFound`] when nothing was removed.
    pub fn delete(&self, id: TodoId) -> TodoResult<()> {
        if self.store.delete(id).map_err(TodoError::internal)? {
            info!(%id, "deleted todo");
            Ok(())
        } else {
            Err(TodoError::NotFound(id))
        }
    }

    /// Mark a todo done, stamping the completion time. Idempotent.
    ///
    /// # Errors
    /// Returns [`TodoError::NotFound`] when the id is unknown.
    pub fn mark_done(&self, id: TodoId) -> TodoResult<Todo> {
        let mut todo = self.get(id)?;
        if todo.mark_done(self.clock.now()) {
            self.store.put(todo.clone()).map_err(TodoError::internal)?;
            info!(%id, "marked todo done");
        }
        Ok(todo)
    }

    /// Mark a todo pending again, clearing the completion time. Idempotent.
    ///
    /// # Errors
    /// Returns [`TodoError::NotFound`] when the id is unknown.
    pub fn mark_undone(&self, id: TodoId) -> TodoResult<Todo> {
        let mut todo = self.get(id)?;
        if todo.mark_undone() {
            self.store.put(todo.clone()).map_err(TodoError::internal)?;
            info!(%id, "marked todo undone");
        }
        Ok(todo)
    }

    /// Filter, sort and paginate the current snapshot.
    ///
    /// # Errors
    /// Returns [`TodoError::Internal`] when the store fails.
    pub fn list(&self, query: &TodoQuery) -> TodoResult<Page<Todo>> {
        let todos = self.store.list_all().map_err(TodoError::internal)?;
        Ok(select(todos, query))
    }

    /// Completion-time averages over every done todo.
    ///
    /// # Errors
    /// Returns [`TodoError::Internal`] when the store fails.
    pub fn metrics(&self) -> TodoResult<CompletionMetrics> {
        let todos = self.store.list_all().map_err(TodoError::internal)?;
        Ok(aggregate(&todos))
    }

    /// Whether a todo with this id is stored.
    ///
    /// # Errors
    /// Returns [`TodoError::Internal`] when the store fails.
    pub fn exists(&self, id: TodoId) -> TodoResult<bool> {
        self.store.exists(id).map_err(TodoError::internal)
    }

    /// Number of stored todos.
    ///
    /// # Errors
    /// Returns [`TodoError::Internal`] when the store fails.
    pub fn count(&self) -> TodoResult<usize> {
        self.store.len().map_err(TodoError::internal)
    }
}

fn parse_text(raw: &str, violations: &mut Violations) -> Option<TodoText> {
    TodoText::parse(raw)
        .map_err(|err| violations.push("text", err.to_string()))
        .ok()
}

fn parse_priority(raw: &str, violations: &mut Violations) -> Option<Priority> {
    raw.parse::<Priority>()
        .map_err(|err| violations.push("priority", err.to_string()))
        .ok()
}
