//! Environment traits - injected dependencies for the todo store.
//!
//! All sources of non-determinism (wall-clock time, identifier assignment)
//! are abstracted behind traits and handed to the store at construction, so
//! tests can run with fixed time and predictable ids.

use crate::todo::TodoId;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use hypertodo_core::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let before = clock.now();
/// assert!(clock.now() >= before);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of todo identifiers.
///
/// Implementations must hand out unique, monotonically increasing ids and be
/// safe to call from concurrently running requests.
pub trait IdGenerator: Send + Sync {
    /// Produce the next identifier, or `None` once the id space is used up.
    fn next_id(&self) -> Option<TodoId>;
}

/// Atomic counter handing out `1, 2, 3, ...` (or starting at a chosen value).
///
/// Ids never repeat: the last id handed out is `u64::MAX - 1`, after which
/// every call returns `None`.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator whose first id is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first id is `first`.
    ///
    /// Ids are positive, so a `first` of `0` starts at `1`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        let first = if first == 0 { 1 } else { first };
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> Option<TodoId> {
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .ok()
            .map(TodoId::new)
    }
}
