//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints and middleware.

use crate::csrf::csrf_layer;
use crate::error::AppError;
use crate::handlers::{health, lang, pages, todos};
use crate::middleware::request_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    http::Uri,
    routing::{any, get, put},
};
use hypertodo_core::TodoId;
use std::num::ParseIntError;
use thiserror::Error;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Errors turning a path segment into a [`TodoId`].
#[derive(Error, Debug)]
pub enum RoutingError {
    /// The segment is not a decimal number, so no todo route matches
    #[error("path segment {0:?} is not a todo id")]
    NotATodoId(String),

    /// The segment is numeric but does not fit a todo id
    #[error("parsing id string {raw:?}")]
    InvalidId {
        /// Segment as received
        raw: String,
        /// Parse failure
        #[source]
        source: ParseIntError,
    },
}

/// Parse the `:id` segment of a todo route.
///
/// # Errors
///
/// [`RoutingError::NotATodoId`] unless `raw` is all ASCII digits,
/// [`RoutingError::InvalidId`] when the number overflows `u64`.
pub fn parse_todo_id(raw: &str) -> Result<TodoId, RoutingError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RoutingError::NotATodoId(raw.to_string()));
    }
    raw.parse::<u64>()
        .map(TodoId::new)
        .map_err(|source| RoutingError::InvalidId {
            raw: raw.to_string(),
            source,
        })
}

/// Build the complete Axum router.
///
/// # Routes
///
/// - `GET /` - landing page
/// - `GET /health` - liveness
/// - `/todos` - 301 to `/todos/`
/// - `GET /todos/` - todo list (page or fragment)
/// - `POST /todos/` - create a todo
/// - `GET /todos/:id/` - one row
/// - `PUT /todos/:id/` - re-render one row (empty update)
/// - `DELETE /todos/:id/` - delete a todo
/// - `PUT /todos/:id/_done/` - set the done flag
/// - `PUT /todos/:id/_text/` - replace the text
/// - `GET /todos/:id/edit/` - row in edit mode
/// - `GET|POST /lang/` - choose the UI language
///
/// Unknown paths get 404, known paths with another method 405. Every
/// request passes the request-id, trace and compression layers; unsafe
/// methods must also pass the CSRF check.
pub fn build_router(state: AppState) -> Router {
    let secure_cookies = state.secure_cookies;

    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health::health_check))
        .route("/todos", any(pages::todos_redirect))
        .route("/todos/", get(todos::list).post(todos::create))
        .route(
            "/todos/:id/",
            get(todos::get).put(todos::refresh).delete(todos::delete),
        )
        .route("/todos/:id/_done/", put(todos::set_done))
        .route("/todos/:id/_text/", put(todos::set_text))
        .route("/todos/:id/edit/", get(todos::edit))
        .route("/lang/", get(lang::select_from_query).post(lang::select_from_form))
        .fallback(not_found)
        .layer(csrf_layer(secure_cookies))
        .layer(request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn not_found(uri: Uri) -> AppError {
    AppError::no_route(uri.path())
}
