//! View rendering.
//!
//! Handlers pick a template by name and hand the [`Renderer`] a
//! [`ViewData`] value plus the per-request [`ViewContext`]. The renderer
//! fails on unknown template names and on data of the wrong shape instead
//! of producing partial output.

mod html;

pub use html::HtmlRenderer;

use crate::i18n::{Language, Translator};
use hypertodo_core::{FilterChip, Todo};
use thiserror::Error;

/// Template names.
pub mod templates {
    /// Landing page (full page)
    pub const INDEX: &str = "index.html";
    /// Todo list page (full page)
    pub const TODOS_INDEX: &str = "todos_index.html";
    /// Todo list section only (fragment)
    pub const TODO_LIST: &str = "todo-list.html";
    /// One todo row, optionally with the count refreshed out of band (fragment)
    pub const TODO_LIST_ITEM: &str = "todo-list-item.html";
    /// Only the out-of-band count (fragment)
    pub const TODO_LIST_NUMBER: &str = "todo-list-number.html";
    /// One todo row in edit mode (fragment)
    pub const TODO_EDIT_ITEM: &str = "todo-edit-item.html";

    /// Every template the HTML renderer knows.
    pub const ALL: [&str; 6] = [
        INDEX,
        TODOS_INDEX,
        TODO_LIST,
        TODO_LIST_ITEM,
        TODO_LIST_NUMBER,
        TODO_EDIT_ITEM,
    ];
}

/// Errors produced while rendering a view.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No template has this name
    #[error("unknown template {0:?}")]
    UnknownTemplate(String),

    /// The template needs a different kind of data
    #[error("template {template:?} expects {expected} data")]
    DataMismatch {
        /// Template being rendered
        template: String,
        /// Kind of data it needs
        expected: &'static str,
    },

    /// Writing the output failed
    #[error("executing template: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Produces HTML for a named template.
pub trait Renderer: Send + Sync {
    /// Render `template` with `data`.
    ///
    /// # Errors
    ///
    /// [`RenderError::UnknownTemplate`] for unknown names,
    /// [`RenderError::DataMismatch`] when `data` does not fit the template,
    /// [`RenderError::Format`] when writing fails.
    fn render(
        &self,
        template: &str,
        data: &ViewData,
        ctx: &ViewContext,
    ) -> Result<String, RenderError>;
}

/// Per-request values every template may use.
///
/// Built by the [`ViewContext`] extractor from the language cookie,
/// `Accept-Language`, the CSRF extension and `HX-Request`.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    /// Resolved UI language
    pub language: Language,
    /// Message lookup for `language`
    pub translator: Translator,
    /// CSRF token to embed in forms and scripted requests
    pub csrf_token: Option<String>,
    /// Whether the client asked for a fragment
    pub partial: bool,
}

impl ViewContext {
    /// Context for `language` without CSRF token.
    #[must_use]
    pub const fn new(language: Language) -> Self {
        Self {
            language,
            translator: language.translator(),
            csrf_token: None,
            partial: false,
        }
    }

    /// Attach a CSRF token.
    #[must_use]
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Translate a message key.
    #[must_use]
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.translator.text(key)
    }
}

/// One todo row (or just the count when `todo` is `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListItem {
    /// Row to render
    pub todo: Option<Todo>,
    /// Also refresh the count out of band
    pub update_number: bool,
    /// Number of todos passing the active filter
    pub filtered_count: usize,
    /// Active `filter` parameter, carried into the row's links
    pub filter: Option<&'static str>,
}

/// The todo list section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListPage {
    /// Todos passing the active filter, in order
    pub todos: Vec<Todo>,
    /// Filter chips in display order
    pub chips: Vec<FilterChip>,
    /// Active `filter` parameter
    pub filter: Option<&'static str>,
    /// Form errors to show above the list
    pub errors: Vec<String>,
}

impl TodoListPage {
    /// Number of todos shown
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.todos.len()
    }
}

/// One todo row in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditItem {
    /// Todo being edited
    pub todo: Todo,
    /// Active `filter` parameter
    pub filter: Option<&'static str>,
}

/// Data handed to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewData {
    /// No data (landing page)
    Empty,
    /// The todo list section
    List(TodoListPage),
    /// One row or the count
    Item(TodoListItem),
    /// One row in edit mode
    Edit(EditItem),
}

impl ViewData {
    fn list(&self, template: &str) -> Result<&TodoListPage, RenderError> {
        match self {
            Self::List(page) => Ok(page),
            _ => Err(mismatch(template, "list")),
        }
    }

    fn item(&self, template: &str) -> Result<&TodoListItem, RenderError> {
        match self {
            Self::Item(item) => Ok(item),
            _ => Err(mismatch(template, "item")),
        }
    }

    fn edit(&self, template: &str) -> Result<&EditItem, RenderError> {
        match self {
            Self::Edit(edit) => Ok(edit),
            _ => Err(mismatch(template, "edit")),
        }
    }
}

fn mismatch(template: &str, expected: &'static str) -> RenderError {
    RenderError::DataMismatch {
        template: template.to_string(),
        expected,
    }
}
