//! Todo endpoints.
//!
//! - GET /todos/ - List todos (page, or the list section for htmx)
//! - POST /todos/ - Create a todo
//! - GET /todos/:id/ - One row
//! - PUT /todos/:id/ - Apply an empty update and re-render the row
//! - DELETE /todos/:id/ - Delete a todo
//! - PUT /todos/:id/_done/ - Set the done flag
//! - PUT /todos/:id/_text/ - Replace the text
//! - GET /todos/:id/edit/ - One row in edit mode
//!
//! The `filter` parameter is read from the form body first, then from the
//! query string, and is carried into every link the response contains.

use super::{redirect, render};
use crate::error::AppError;
use crate::extractors::{HX_REQUEST_HEADER, TodoPath};
use crate::metrics;
use crate::state::AppState;
use crate::views::templates::{
    TODO_EDIT_ITEM, TODO_LIST, TODO_LIST_ITEM, TODO_LIST_NUMBER, TODOS_INDEX,
};
use crate::views::{EditItem, TodoListItem, TodoListPage, ViewContext, ViewData};
use crate::WebResult;
use anyhow::Context;
use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use hypertodo_core::filter::evaluate;
use hypertodo_core::{FilterSelection, Todo, TodoError, TodoUpdate};
use serde::Deserialize;

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters accepted by every todo endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// `done`, `notdone`, or empty for all
    pub filter: Option<String>,
}

/// Form posted to create a todo.
#[derive(Debug, Default, Deserialize)]
pub struct NewTodoForm {
    /// Text of the new todo
    #[serde(rename = "new-todo", default)]
    pub new_todo: String,
    /// Active filter
    pub filter: Option<String>,
}

/// Form of the done checkbox; an unchecked box sends no `done` field.
#[derive(Debug, Default, Deserialize)]
pub struct DoneForm {
    /// `"done"` marks the todo done, anything else (or nothing) undone
    pub done: Option<String>,
    /// Active filter
    pub filter: Option<String>,
}

/// Form of the edit row.
#[derive(Debug, Default, Deserialize)]
pub struct TextForm {
    /// Replacement text
    #[serde(default)]
    pub text: String,
    /// Active filter
    pub filter: Option<String>,
}

/// Message shown when a todo is submitted without text.
const TEXT_REQUIRED: &str = "Todo text is required";

/// Evaluate the filter from the form body, falling back to the query.
fn selection(form: Option<&str>, query: &FilterQuery) -> FilterSelection {
    let param = form
        .filter(|v| !v.is_empty())
        .or(query.filter.as_deref());
    evaluate(param)
}

fn count(state: &AppState, selection: &FilterSelection) -> WebResult<usize> {
    state
        .store
        .count(&selection.filter)
        .context("counting todos")
        .map_err(AppError::from)
}

/// List page, or only the list section for htmx requests.
fn render_list(
    state: &AppState,
    ctx: &ViewContext,
    selection: FilterSelection,
    errors: Vec<String>,
) -> WebResult<Html<String>> {
    let todos = state
        .store
        .find(&selection.filter)
        .context("finding todos")?;
    let page = ViewData::List(TodoListPage {
        todos,
        filter: selection.param(),
        chips: selection.chips,
        errors,
    });
    let template = if ctx.partial { TODO_LIST } else { TODOS_INDEX };
    render(state, template, &page, ctx)
}

/// Row of a changed todo, or only the count once it left the filter.
///
/// The count is refreshed out of band whenever it may have changed: the
/// todo dropped out of the filtered list, or a filter is active.
fn render_changed(
    state: &AppState,
    ctx: &ViewContext,
    selection: &FilterSelection,
    todo: Todo,
) -> WebResult<Html<String>> {
    let visible = selection.filter.matches(&todo);
    let update_number = !visible || selection.filter.is_active();
    let filtered_count = if update_number {
        count(state, selection)?
    } else {
        0
    };

    let template = if visible {
        TODO_LIST_ITEM
    } else {
        TODO_LIST_NUMBER
    };
    let item = ViewData::Item(TodoListItem {
        todo: visible.then_some(todo),
        update_number,
        filtered_count,
        filter: selection.param(),
    });
    render(state, template, &item, ctx)
}

// ============================================================================
// Handlers
// ============================================================================

/// List todos.
///
/// Full page normally; with `HX-Request: true` only the list section
/// (chips, form, rows and count) so a chip click can swap it in place.
/// Both answers share the URL, so the response varies on `HX-Request`.
///
/// # Errors
///
/// 500 when the store or renderer fails.
#[allow(clippy::unused_async)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
) -> WebResult<Response> {
    let html = render_list(&state, &ctx, selection(None, &query), Vec::new())?;
    Ok(([(header::VARY, HX_REQUEST_HEADER)], html).into_response())
}

/// Create a todo.
///
/// Blank text is rejected: htmx requests get only the count back, plain
/// form posts get the list page with the error listed. After a successful
/// create htmx requests receive the new row (when it passes the active
/// filter) with the count refreshed out of band; plain form posts are
/// redirected to `/todos/` with 302.
///
/// # Errors
///
/// 500 when the store or renderer fails.
#[allow(clippy::unused_async)]
pub async fn create(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
    Form(form): Form<NewTodoForm>,
) -> WebResult<Response> {
    let selection = selection(form.filter.as_deref(), &query);

    let todo = match state.store.create(&form.new_todo) {
        Ok(todo) => todo,
        Err(TodoError::Validation(reason)) => {
            tracing::warn!(%reason, "Invalid todo form");
            if ctx.partial {
                let item = ViewData::Item(TodoListItem {
                    todo: None,
                    update_number: true,
                    filtered_count: count(&state, &selection)?,
                    filter: selection.param(),
                });
                return Ok(render(&state, TODO_LIST_NUMBER, &item, &ctx)?.into_response());
            }
            let errors = vec![ctx.t(TEXT_REQUIRED).to_string()];
            return Ok(render_list(&state, &ctx, selection, errors)?.into_response());
        }
        Err(err) => return Err(anyhow::Error::new(err).context("creating todo").into()),
    };

    metrics::todo_created();
    tracing::info!(id = %todo.id, "Todo created");

    if !ctx.partial {
        return Ok(redirect(StatusCode::FOUND, "/todos/"));
    }

    let visible = selection.filter.matches(&todo);
    let item = ViewData::Item(TodoListItem {
        todo: visible.then_some(todo),
        update_number: true,
        filtered_count: count(&state, &selection)?,
        filter: selection.param(),
    });
    let template = if visible {
        TODO_LIST_ITEM
    } else {
        TODO_LIST_NUMBER
    };
    Ok(render(&state, template, &item, &ctx)?.into_response())
}

/// One todo row.
///
/// # Errors
///
/// 500 when the todo does not exist or the store or renderer fails.
#[allow(clippy::unused_async)]
pub async fn get(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
) -> WebResult<Html<String>> {
    let todo = state
        .store
        .get_by_id(id)
        .with_context(|| format!("getting todo {id}"))?;

    let item = ViewData::Item(TodoListItem {
        todo: Some(todo),
        update_number: false,
        filtered_count: 0,
        filter: selection(None, &query).param(),
    });
    render(&state, TODO_LIST_ITEM, &item, &ctx)
}

/// Re-render one row through an empty update.
///
/// # Errors
///
/// 500 when the todo does not exist or the store or renderer fails.
#[allow(clippy::unused_async)]
pub async fn refresh(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
) -> WebResult<Html<String>> {
    let todo = state
        .store
        .update(id, TodoUpdate::default())
        .with_context(|| format!("updating todo {id}"))?;

    render_changed(&state, &ctx, &selection(None, &query), todo)
}

/// Delete a todo.
///
/// htmx requests receive the new count (swapped out of band, so the row
/// disappears); other requests an empty 200.
///
/// # Errors
///
/// 500 when the todo does not exist or the store or renderer fails.
#[allow(clippy::unused_async)]
pub async fn delete(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
) -> WebResult<Response> {
    state
        .store
        .delete(id)
        .with_context(|| format!("deleting todo {id}"))?;

    metrics::todo_deleted();
    tracing::info!(%id, "Todo deleted");

    if !ctx.partial {
        return Ok(StatusCode::OK.into_response());
    }

    let selection = selection(None, &query);
    let item = ViewData::Item(TodoListItem {
        todo: None,
        update_number: true,
        filtered_count: count(&state, &selection)?,
        filter: selection.param(),
    });
    Ok(render(&state, TODO_LIST_NUMBER, &item, &ctx)?.into_response())
}

/// Set the done flag from the checkbox form.
///
/// # Errors
///
/// 500 when the todo does not exist or the store or renderer fails.
#[allow(clippy::unused_async)]
pub async fn set_done(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
    Form(form): Form<DoneForm>,
) -> WebResult<Html<String>> {
    let done = form.done.as_deref() == Some("done");
    let todo = state
        .store
        .update(id, TodoUpdate::done(done))
        .with_context(|| format!("updating todo {id}"))?;

    metrics::todo_updated("done");
    tracing::info!(%id, done, "Todo updated");

    render_changed(&state, &ctx, &selection(form.filter.as_deref(), &query), todo)
}

/// Replace the text from the edit form.
///
/// # Errors
///
/// 400 for blank text, 500 when the todo does not exist or the store or
/// renderer fails.
#[allow(clippy::unused_async)]
pub async fn set_text(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
    Form(form): Form<TextForm>,
) -> WebResult<Html<String>> {
    let todo = match state.store.update(id, TodoUpdate::text(form.text)) {
        Ok(todo) => todo,
        Err(TodoError::Validation(reason)) => return Err(AppError::bad_request(reason)),
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("updating todo {id}"))
                .into());
        }
    };

    metrics::todo_updated("text");
    tracing::info!(%id, "Todo updated");

    render_changed(&state, &ctx, &selection(form.filter.as_deref(), &query), todo)
}

/// One todo row in edit mode.
///
/// # Errors
///
/// 404 when the todo does not exist, 500 when the store or renderer fails.
#[allow(clippy::unused_async)]
pub async fn edit(
    State(state): State<AppState>,
    TodoPath(id): TodoPath,
    Query(query): Query<FilterQuery>,
    ctx: ViewContext,
) -> WebResult<Html<String>> {
    let todo = match state.store.get_by_id(id) {
        Ok(todo) => todo,
        Err(err) if err.is_not_found() => return Err(AppError::not_found("Todo", id)),
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("getting todo {id}"))
                .into());
        }
    };

    let edit = ViewData::Edit(EditItem {
        todo,
        filter: selection(None, &query).param(),
    });
    render(&state, TODO_EDIT_ITEM, &edit, &ctx)
}
