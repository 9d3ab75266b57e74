//! # Hypertodo Core
//!
//! Domain types, the todo store and filter evaluation for the hypertodo
//! web application.
//!
//! This crate contains everything that does not know about HTTP:
//!
//! - **Todo**: The record owned by the store (soft-deletable, timestamped)
//! - **Store**: The `TodoStore` capability and its in-memory implementation
//! - **Filter**: Translation of the request-level `filter` parameter into a
//!   [`TodoFilter`] plus the filter chips shown in the UI
//! - **Environment**: Injected dependencies (`Clock`, `IdGenerator`)
//!
//! ## Example
//!
//! ```
//! use hypertodo_core::{InMemoryTodoStore, TodoFilter, TodoStore, TodoUpdate};
//!
//! # fn main() -> Result<(), hypertodo_core::TodoError> {
//! let store = InMemoryTodoStore::new();
//!
//! let milk = store.create("  Buy milk  ")?;
//! assert_eq!(milk.text, "Buy milk");
//!
//! store.update(milk.id, TodoUpdate::done(true))?;
//!
//! let remaining = store.find(&TodoFilter::done(false))?;
//! assert!(remaining.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod error;
pub mod filter;
pub mod store;
pub mod todo;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use environment::{Clock, IdGenerator, SequentialIdGenerator, SystemClock};
pub use error::TodoError;
pub use filter::{FilterChip, FilterSelection, TodoFilter};
pub use store::{InMemoryTodoStore, TodoStore};
pub use todo::{Todo, TodoId, TodoUpdate};

/// Result type alias for store operations.
pub type TodoResult<T> = Result<T, TodoError>;
