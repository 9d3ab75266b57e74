//! HTTP request handlers.
//!
//! Handlers make one store call (plus a count where a fragment shows it),
//! then either render a template or redirect.

pub mod health;
pub mod lang;
pub mod pages;
pub mod todos;

// Re-export common handler utilities
pub use health::health_check;

use crate::WebResult;
use crate::state::AppState;
use crate::views::{ViewContext, ViewData};
use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

/// Render `template` with the state's renderer.
fn render(
    state: &AppState,
    template: &str,
    data: &ViewData,
    ctx: &ViewContext,
) -> WebResult<Html<String>> {
    let html = state.renderer.render(template, data, ctx)?;
    Ok(Html(html))
}

/// Redirect with an explicit status (301, 302 or 303).
fn redirect(status: StatusCode, location: &'static str) -> Response {
    (status, [(header::LOCATION, location)]).into_response()
}
