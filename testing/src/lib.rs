//! # Hypertodo Testing
//!
//! Testing utilities and helpers for hypertodo.
//!
//! This crate provides:
//! - Deterministic implementations of the environment traits
//! - Store fixtures and a Given-When-Then store harness
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use hypertodo_core::{TodoFilter, TodoStore, TodoUpdate};
//! use hypertodo_testing::{helpers, StoreTest};
//!
//! StoreTest::new()
//!     .given_todos(["A", "B", "C"])
//!     .when(|store, todos| store.update(todos[1].id, TodoUpdate::done(true)).map(|_| ()))
//!     .then_texts(TodoFilter::done(false), ["A", "C"])
//!     .then_texts(TodoFilter::done(true), ["B"])
//!     .run();
//!
//! let store = helpers::seeded_store(["x"]);
//! assert_eq!(store.count(&TodoFilter::all()).unwrap(), 1);
//! ```


pub use store_test::StoreTest;

/// Deterministic implementations of the environment traits.
pub mod mocks {
    use chrono::{DateTime, Duration, Utc};
    use hypertodo_core::Clock;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use hypertodo_testing::mocks::FixedClock;
    /// use hypertodo_core::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every reading.
    ///
    /// Useful when a test needs strictly ordered timestamps (e.g. a todo
    /// completed after it was created).
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock whose first reading is `start`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            // A poisoned lock only happens after a panicking test; keep counting.
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// The instant every test clock starts at (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }

    /// Create a clock starting at [`epoch`] and advancing one second per reading
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(epoch(), Duration::seconds(1))
    }
}

/// Store fixtures.
pub mod helpers {
    use super::mocks::stepping_clock;
    use hypertodo_core::{InMemoryTodoStore, SequentialIdGenerator, Todo, TodoStore};
    use std::sync::Arc;

    /// Empty store with a stepping clock and ids starting at 1.
    #[must_use]
    pub fn test_store() -> InMemoryTodoStore {
        InMemoryTodoStore::with_environment(
            Arc::new(stepping_clock()),
            Arc::new(SequentialIdGenerator::new()),
        )
    }

    /// Store pre-filled with one todo per text, in order.
    ///
    /// Blank texts are skipped (the store rejects them).
    #[must_use]
    pub fn seeded_store<I, T>(texts: I) -> InMemoryTodoStore
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let store = test_store();
        for text in texts {
            let _ = store.create(text.as_ref());
        }
        store
    }

    /// The texts of `todos`, in order.
    #[must_use]
    pub fn texts(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|t| t.text.as_str()).collect()
    }

    /// Install a `tracing` subscriber writing to the test output.
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use hypertodo_core::TodoFilter;
    use proptest::prelude::*;

    /// Operation applied to a store in generated sequences.
    ///
    /// Indices refer to the position among todos created so far and are
    /// reduced modulo their count when applied.
    #[derive(Debug, Clone)]
    pub enum StoreOp {
        /// Create a todo with this text (may be blank)
        Create(String),
        /// Set the done flag of the n-th created todo
        SetDone(usize, bool),
        /// Delete the n-th created todo
        Delete(usize),
        /// Delete several created todos at once
        DeleteMany(Vec<usize>),
    }

    /// Non-blank todo text, possibly padded with whitespace.
    pub fn todo_text() -> impl Strategy<Value = String> {
        ("[ \t]{0,3}", "[a-zA-Z0-9][a-zA-Z0-9 ]{0,20}", "[ \t]{0,3}")
            .prop_map(|(pre, body, post)| format!("{pre}{body}{post}"))
    }

    /// Text consisting only of whitespace (including the empty string).
    pub fn blank_text() -> impl Strategy<Value = String> {
        "[ \t\n]{0,6}"
    }

    /// Any of the three filter states.
    pub fn todo_filter() -> impl Strategy<Value = TodoFilter> {
        prop_oneof![
            Just(TodoFilter::all()),
            Just(TodoFilter::done(true)),
            Just(TodoFilter::done(false)),
        ]
    }

    /// A single store operation.
    pub fn store_op() -> impl Strategy<Value = StoreOp> {
        prop_oneof![
            3 => prop_oneof![todo_text(), blank_text()].prop_map(StoreOp::Create),
            2 => (any::<usize>(), any::<bool>()).prop_map(|(i, d)| StoreOp::SetDone(i, d)),
            2 => any::<usize>().prop_map(StoreOp::Delete),
            1 => prop::collection::vec(any::<usize>(), 0..4).prop_map(StoreOp::DeleteMany),
        ]
    }

    /// A sequence of store operations.
    pub fn store_ops() -> impl Strategy<Value = Vec<StoreOp>> {
        prop::collection::vec(store_op(), 0..40)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, stepping_clock, test_clock};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hypertodo_core::{Clock, TodoFilter, TodoStore};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_stepping_clock() {
        let clock = stepping_clock();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, chrono::Duration::seconds(1));
    }

    #[test]
    fn test_seeded_store_skips_blank() {
        let store = helpers::seeded_store(["a", "  ", "b"]);
        let todos = store.find(&TodoFilter::all()).unwrap();
        assert_eq!(helpers::texts(&todos), vec!["a", "b"]);
    }
}
