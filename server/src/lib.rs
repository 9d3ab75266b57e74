//! Hypertodo server.
//!
//! Configuration loading and startup helpers for the `hypertodo` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]

pub mod config;

pub use config::Config;

use hypertodo_core::{TodoResult, TodoStore};

/// Todos created on startup when seeding is enabled.
pub const SEED_TODOS: [&str; 3] = ["Do some stuff", "Make other things", "Call your mom"];

/// Fill `store` with [`SEED_TODOS`].
///
/// # Errors
///
/// Returns the first store error.
pub fn seed(store: &dyn TodoStore) -> TodoResult<usize> {
    for text in SEED_TODOS {
        store.create(text)?;
    }
    Ok(SEED_TODOS.len())
}
