//! Error taxonomy shared by every surface of the service.

use std::fmt;

use thiserror::Error;
use todo_core::TodoId;

/// Result alias used by [`crate::TodoService`].
pub type TodoResult<T> = Result<T, TodoError>;

/// A rule broken by one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

/// Every field violation found while validating one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a violation.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    /// True when nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recorded violations.
    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|violation| violation.field == field)
            .map(|violation| violation.message.as_str())
    }

    /// `Ok(())` when empty, otherwise [`TodoError::InvalidArgument`].
    ///
    /// # Errors
    /// Returns the collected violations as an error when any were recorded.
    pub fn into_result(self) -> TodoResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TodoError::InvalidArgument(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl IntoIterator for Violations {
    type Item = FieldViolation;
    type IntoIter = std::vec::IntoIter<FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Errors returned by service operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The referenced todo does not exist.
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    /// The id could not be parsed.
    #[error("Invalid todo id: {0}")]
    MalformedId(String),

    /// One or more fields failed validation.
    #[error("Validation failed: {0}")]
    InvalidArgument(Violations),

    /// The backing store failed.
    #[error("Internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl TodoError {
    /// Wrap any store error.
    #[must_use]
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// Single-field validation failure.
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut violations = Violations::new();
        violations.push(field, message);
        Self::InvalidArgument(violations)
    }
}

/// Parse a textual id, mapping failures to [`TodoError::MalformedId`].
///
/// # Errors
/// Returns [`TodoError::MalformedId`] when `raw` is not a valid id.
pub fn parse_id(raw: &str) -> TodoResult<TodoId> {
    raw.parse()
        .map_err(|_| TodoError::MalformedId(raw.to_owned()))
}
