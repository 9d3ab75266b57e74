//! Domain types for todo records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
///
/// Records are never removed from the store: deletion only sets `deleted`
/// and `deleted_at`, and deleted records are invisible to every read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, assigned at creation
    pub id: TodoId,
    /// Trimmed, never empty
    pub text: String,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
    /// Whether the todo is completed
    pub done: bool,
    /// When the todo was last marked done (only set while `done`)
    pub done_at: Option<DateTime<Utc>>,
    /// Soft-delete flag
    pub deleted: bool,
    /// When the todo was deleted
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Creates a new, not yet completed todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            created_at,
            done: false,
            done_at: None,
            deleted: false,
            deleted_at: None,
        }
    }

    /// Sets the completion flag.
    ///
    /// `done_at` is stamped only on the transition to done and cleared on
    /// the transition back, so it is `Some` exactly when `done` is true.
    pub fn set_done(&mut self, done: bool, at: DateTime<Utc>) {
        match (self.done, done) {
            (false, true) => self.done_at = Some(at),
            (true, false) => self.done_at = None,
            _ => {}
        }
        self.done = done;
    }

    /// Marks the todo as deleted
    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        self.deleted = true;
        self.deleted_at = Some(at);
    }

    /// Whether the todo is visible to reads
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.deleted
    }
}

/// Partial update applied by [`TodoStore::update`](crate::TodoStore::update).
///
/// Only the fields that are `Some` are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    /// Replacement text (trimmed and validated by the store)
    pub text: Option<String>,
    /// New completion flag
    pub done: Option<bool>,
}

impl TodoUpdate {
    /// Update only the text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            done: None,
        }
    }

    /// Update only the completion flag
    #[must_use]
    pub const fn done(done: bool) -> Self {
        Self {
            text: None,
            done: Some(done),
        }
    }

    /// Whether the update changes anything
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.done.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn todo_id_display() {
        assert_eq!(TodoId::new(42).to_string(), "42");
    }

    #[test]
    fn todo_new() {
        let now = Utc::now();
        let todo = Todo::new(TodoId::new(1), "Test todo".to_string(), now);

        assert_eq!(todo.id, TodoId::new(1));
        assert_eq!(todo.text, "Test todo");
        assert!(!todo.done);
        assert_eq!(todo.created_at, now);
        assert_eq!(todo.done_at, None);
        assert!(todo.is_live());
    }

    #[test]
    fn set_done_stamps_only_on_transition() {
        let created = Utc::now();
        let mut todo = Todo::new(TodoId::new(1), "Test".to_string(), created);

        let first = created + Duration::seconds(5);
        todo.set_done(true, first);
        assert!(todo.done);
        assert_eq!(todo.done_at, Some(first));

        todo.set_done(true, first + Duration::seconds(5));
        assert_eq!(todo.done_at, Some(first));

        todo.set_done(false, first + Duration::seconds(10));
        assert!(!todo.done);
        assert_eq!(todo.done_at, None);
    }

    #[test]
    fn soft_delete_keeps_record_data() {
        let now = Utc::now();
        let mut todo = Todo::new(TodoId::new(7), "Keep me".to_string(), now);
        todo.soft_delete(now);

        assert!(todo.deleted);
        assert_eq!(todo.deleted_at, Some(now));
        assert_eq!(todo.text, "Keep me");
        assert!(!todo.is_live());
    }

    #[test]
    fn update_constructors() {
        assert_eq!(TodoUpdate::done(true).done, Some(true));
        assert_eq!(TodoUpdate::text("x").text.as_deref(), Some("x"));
        assert!(TodoUpdate::default().is_empty());
    }
}
