//! Error types for store operations.

use crate::todo::TodoId;
use thiserror::Error;

/// Errors that can occur during todo store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Input failed validation (e.g. empty text)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No live todo has this id
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// A bulk operation matched fewer todos than requested
    #[error("Could not delete all todos ({deleted} of {requested})")]
    PartialFailure {
        /// Number of todos actually deleted
        deleted: usize,
        /// Number of distinct ids requested
        requested: usize,
    },

    /// The id generator has no identifiers left
    #[error("No todo ids left")]
    IdsExhausted,

    /// The store could not be accessed (a writer panicked while holding the lock)
    #[error("Todo store unavailable")]
    Unavailable,
}

impl TodoError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error means the todo does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
