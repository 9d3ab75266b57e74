//! Axum web layer for hypertodo.
//!
//! Turns browser requests into [`TodoStore`](hypertodo_core::TodoStore)
//! calls and renders the result as full pages or HTML fragments.
//!
//! # Request Flow
//!
//! 1. **Middleware** assigns a request id, opens a tracing span and checks
//!    the CSRF token of state-changing requests
//! 2. **Route table** selects a handler; typed extractors pull the todo id,
//!    form fields and the per-request [`ViewContext`]
//! 3. **Handler** calls the store (and re-reads the filtered count when a
//!    fragment needs it)
//! 4. **Renderer** produces HTML for the chosen template: a fragment when
//!    the request carries `HX-Request: true`, a full page otherwise
//!
//! # Example
//!
//! ```no_run
//! use hypertodo_core::InMemoryTodoStore;
//! use hypertodo_web::{AppState, build_router};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = AppState::new(Arc::new(InMemoryTodoStore::new()));
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cookies;
pub mod csrf;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod i18n;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

// Re-export key types for convenience
pub use csrf::{CSRF_COOKIE, CSRF_FIELD, CSRF_HEADER, CsrfToken, csrf_layer};
pub use error::AppError;
pub use extractors::{HX_HISTORY_RESTORE_HEADER, HX_REQUEST_HEADER, HxRequest, TodoPath};
pub use i18n::{Language, Translator};
pub use middleware::{REQUEST_ID_HEADER, RequestId, request_id_layer};
pub use routes::{RoutingError, build_router};
pub use state::AppState;
pub use views::{HtmlRenderer, RenderError, Renderer, ViewContext, ViewData};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
