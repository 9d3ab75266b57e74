//! Static pages.

use super::{redirect, render};
use crate::WebResult;
use crate::state::AppState;
use crate::views::{ViewContext, ViewData, templates::INDEX};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Response},
};

/// `GET /`: landing page.
///
/// # Errors
///
/// 500 when rendering fails.
#[allow(clippy::unused_async)]
pub async fn index(State(state): State<AppState>, ctx: ViewContext) -> WebResult<Html<String>> {
    render(&state, INDEX, &ViewData::Empty, &ctx)
}

/// `/todos`: permanent redirect to the canonical `/todos/`.
#[allow(clippy::unused_async)]
pub async fn todos_redirect() -> Response {
    redirect(StatusCode::MOVED_PERMANENTLY, "/todos/")
}
