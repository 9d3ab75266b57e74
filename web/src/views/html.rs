//! Server-side HTML for every template.
//!
//! Pages share one layout (navigation, language selector, footer). The
//! todo section, its rows and the count are written by small functions so
//! a full page and its fragments always produce the same markup.

use super::templates::{
    INDEX, TODO_EDIT_ITEM, TODO_LIST, TODO_LIST_ITEM, TODO_LIST_NUMBER, TODOS_INDEX,
};
use super::{EditItem, RenderError, Renderer, TodoListItem, TodoListPage, ViewContext, ViewData};
use crate::csrf::{CSRF_FIELD, CSRF_HEADER};
use crate::i18n::Language;
use hypertodo_core::Todo;
use std::fmt::{self, Write};

/// Default location of the htmx script.
pub const DEFAULT_HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

/// htmx settings for every page.
///
/// Row fragments (`<tr>`) carry an out-of-band `<p>` count. Parsed through a
/// `<template>` both keep their order; parsed through a bare `<table>` the
/// `<p>` is hoisted in front of the row and the swap breaks.
pub const HTMX_CONFIG: &str = r#"{"useTemplateFragments":true}"#;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:48rem;margin:0 auto;padding:0 1rem}\
nav ul{list-style:none;display:flex;gap:1rem;padding:0}\
table{width:100%;border-collapse:collapse}\
td,th{padding:.25rem .5rem;text-align:left}\
tr.done .todo-text{text-decoration:line-through;opacity:.6}\
.chip{padding:.1rem .5rem;border:1px solid #999;border-radius:1rem;text-decoration:none}\
.chip.active{background:#333;color:#fff}\
.errors{color:#b00}";

/// Renders the built-in templates as HTML.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    htmx_src: String,
}

impl HtmlRenderer {
    /// Renderer loading htmx from [`DEFAULT_HTMX_SRC`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_htmx_src(DEFAULT_HTMX_SRC)
    }

    /// Renderer loading htmx from `src`.
    #[must_use]
    pub fn with_htmx_src(src: impl Into<String>) -> Self {
        Self {
            htmx_src: src.into(),
        }
    }

    fn layout(
        &self,
        out: &mut String,
        ctx: &ViewContext,
        body: impl FnOnce(&mut String) -> fmt::Result,
    ) -> fmt::Result {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, r#"<html lang="{}">"#, ctx.language.tag())?;
        writeln!(out, "<head>")?;
        writeln!(out, r#"<meta charset="utf-8">"#)?;
        writeln!(
            out,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#
        )?;
        writeln!(out, "<title>{}</title>", Escaped(ctx.t("Todos")))?;
        writeln!(
            out,
            r#"<meta name="htmx-config" content="{}">"#,
            Escaped(HTMX_CONFIG)
        )?;
        writeln!(out, r#"<script src="{}"></script>"#, Escaped(&self.htmx_src))?;
        writeln!(out, "<style>{STYLE}</style>")?;
        writeln!(out, "</head>")?;

        match &ctx.csrf_token {
            Some(token) => {
                let headers = format!(r#"{{"{CSRF_HEADER}": "{token}"}}"#);
                writeln!(out, r#"<body hx-headers="{}">"#, Escaped(&headers))?;
            }
            None => writeln!(out, "<body>")?,
        }

        writeln!(out, r#"<header aria-label="{}">"#, Escaped(ctx.t("main header")))?;
        writeln!(
            out,
            r#"<nav aria-label="{}"><ul aria-label="{}">"#,
            Escaped(ctx.t("site-wide navigation")),
            Escaped(ctx.t("navigation links"))
        )?;
        writeln!(out, r#"<li><a href="/">{}</a></li>"#, Escaped(ctx.t("Home")))?;
        writeln!(out, r#"<li><a href="/todos/">{}</a></li>"#, Escaped(ctx.t("Todos")))?;
        writeln!(out, "</ul></nav>")?;
        write_language_selector(out, ctx)?;
        writeln!(out, "</header>")?;

        writeln!(out, r#"<main aria-label="{}">"#, Escaped(ctx.t("main page content")))?;
        body(out)?;
        writeln!(out, "</main>")?;

        writeln!(out, r#"<footer aria-label="{}">"#, Escaped(ctx.t("footer")))?;
        writeln!(out, "<p>{} © hypertodo</p>", Escaped(ctx.t("Copyright")))?;
        writeln!(out, "</footer>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn render(
        &self,
        template: &str,
        data: &ViewData,
        ctx: &ViewContext,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        match template {
            INDEX => self.layout(&mut out, ctx, |out| write_index(out, ctx))?,
            TODOS_INDEX => {
                let page = data.list(template)?;
                self.layout(&mut out, ctx, |out| write_todo_section(out, ctx, page))?;
            }
            TODO_LIST => write_todo_section(&mut out, ctx, data.list(template)?)?,
            TODO_LIST_ITEM => write_list_item(&mut out, ctx, data.item(template)?)?,
            TODO_LIST_NUMBER => {
                let item = data.item(template)?;
                write_count(&mut out, ctx, item.filtered_count, true)?;
            }
            TODO_EDIT_ITEM => write_edit_item(&mut out, ctx, data.edit(template)?)?,
            unknown => return Err(RenderError::UnknownTemplate(unknown.to_string())),
        }
        Ok(out)
    }
}

fn write_language_selector(out: &mut String, ctx: &ViewContext) -> fmt::Result {
    writeln!(out, r#"<nav aria-label="{}"><ul>"#, Escaped(ctx.t("Select language")))?;
    for language in Language::ALL {
        let current = if language == ctx.language {
            r#" aria-current="true""#
        } else {
            ""
        };
        writeln!(
            out,
            r#"<li><a href="/lang/?lang={tag}" hreflang="{tag}"{current}>{} {}</a></li>"#,
            language.world_emoji(),
            Escaped(language.label()),
            tag = language.tag(),
        )?;
    }
    writeln!(out, "</ul></nav>")
}

fn write_index(out: &mut String, ctx: &ViewContext) -> fmt::Result {
    writeln!(out, "<h1>{}</h1>", Escaped(ctx.t("Todos")))?;
    writeln!(
        out,
        r#"<p>{}<a href="https://htmx.org">htmx</a>{}</p>"#,
        Escaped(ctx.t("intro(part)1")),
        Escaped(ctx.t("intro(part)2"))
    )?;
    writeln!(out, r#"<p><a href="/todos/">{}</a></p>"#, Escaped(ctx.t("Todo list")))
}

fn write_todo_section(out: &mut String, ctx: &ViewContext, page: &TodoListPage) -> fmt::Result {
    writeln!(
        out,
        r#"<section id="todos" aria-label="{}">"#,
        Escaped(ctx.t("list of todos"))
    )?;
    writeln!(out, "<h1>{}</h1>", Escaped(ctx.t("Todo list")))?;

    if !page.errors.is_empty() {
        writeln!(out, r#"<ul class="errors" role="alert">"#)?;
        for error in &page.errors {
            writeln!(out, "<li>{}</li>", Escaped(error))?;
        }
        writeln!(out, "</ul>")?;
    }

    let action = with_filter("/todos/", page.filter);
    writeln!(
        out,
        r##"<form action="{action}" method="post" hx-post="{action}" hx-target="#todo-list" hx-swap="beforeend" hx-on::after-request="if (event.detail.successful) this.reset()" aria-label="{}">"##,
        Escaped(ctx.t("new todo form")),
        action = Escaped(&action),
    )?;
    if let Some(token) = &ctx.csrf_token {
        writeln!(
            out,
            r#"<input type="hidden" name="{CSRF_FIELD}" value="{}">"#,
            Escaped(token)
        )?;
    }
    writeln!(out, r#"<label for="new-todo">{}</label>"#, Escaped(ctx.t("New todo")))?;
    writeln!(
        out,
        r#"<input id="new-todo" name="new-todo" type="text" placeholder="{}" aria-label="{}" autocomplete="off" required>"#,
        Escaped(ctx.t("What to do …")),
        Escaped(ctx.t("new todo entry"))
    )?;
    writeln!(out, r#"<button type="submit">{}</button>"#, Escaped(ctx.t("Add")))?;
    writeln!(out, "</form>")?;

    writeln!(
        out,
        r#"<nav class="filters" aria-label="{}"><span>{}</span>"#,
        Escaped(ctx.t("Filter todos:")),
        Escaped(ctx.t("Show:"))
    )?;
    for chip in &page.chips {
        let href = with_filter("/todos/", (!chip.value.is_empty()).then_some(chip.value));
        let (class, current) = if chip.active {
            ("chip active", r#" aria-current="true""#)
        } else {
            ("chip", "")
        };
        writeln!(
            out,
            r##"<a class="{class}" href="{href}" hx-get="{href}" hx-target="#todos" hx-swap="outerHTML" hx-push-url="true"{current}>{}</a>"##,
            Escaped(ctx.t(chip.label)),
            href = Escaped(&href),
        )?;
    }
    writeln!(out, "</nav>")?;

    writeln!(out, "<table>")?;
    writeln!(
        out,
        r#"<thead><tr><th scope="col">{}</th><th scope="col">{}</th><th scope="col">{}</th></tr></thead>"#,
        Escaped(ctx.t("Todo")),
        Escaped(ctx.t("Done?")),
        Escaped(ctx.t("Actions"))
    )?;
    writeln!(out, r#"<tbody id="todo-list">"#)?;
    for todo in &page.todos {
        write_row(out, ctx, todo, page.filter)?;
    }
    writeln!(out, "</tbody>")?;
    writeln!(out, "</table>")?;
    write_count(out, ctx, page.filtered_count(), false)?;
    writeln!(out, "</section>")
}

fn write_list_item(out: &mut String, ctx: &ViewContext, item: &TodoListItem) -> fmt::Result {
    if let Some(todo) = &item.todo {
        write_row(out, ctx, todo, item.filter)?;
    }
    if item.update_number {
        write_count(out, ctx, item.filtered_count, true)?;
    }
    Ok(())
}

fn write_row(
    out: &mut String,
    ctx: &ViewContext,
    todo: &Todo,
    filter: Option<&'static str>,
) -> fmt::Result {
    let id = todo.id;
    let class = if todo.done { "todo done" } else { "todo" };
    writeln!(out, r#"<tr id="todo-{id}" class="{class}">"#)?;
    writeln!(out, r#"<td class="todo-text">{}</td>"#, Escaped(&todo.text))?;

    let (checked, toggle_label) = if todo.done {
        (" checked", "Mark undone")
    } else {
        ("", "Mark done")
    };
    writeln!(
        out,
        r#"<td><input type="checkbox" name="done" value="done"{checked} hx-put="{}" hx-target="closest tr" hx-swap="outerHTML" aria-label="{}"></td>"#,
        Escaped(&with_filter(&format!("/todos/{id}/_done/"), filter)),
        Escaped(ctx.t(toggle_label))
    )?;

    writeln!(out, "<td>")?;
    writeln!(
        out,
        r#"<button type="button" hx-get="{}" hx-target="closest tr" hx-swap="outerHTML">{}</button>"#,
        Escaped(&with_filter(&format!("/todos/{id}/edit/"), filter)),
        Escaped(ctx.t("Edit"))
    )?;
    writeln!(
        out,
        r#"<button type="button" hx-delete="{}" hx-confirm="{}" hx-target="closest tr" hx-swap="outerHTML">{}</button>"#,
        Escaped(&with_filter(&format!("/todos/{id}/"), filter)),
        Escaped(ctx.t("Are you sure?")),
        Escaped(ctx.t("Delete"))
    )?;
    writeln!(out, "</td>")?;
    writeln!(out, "</tr>")
}

fn write_edit_item(out: &mut String, ctx: &ViewContext, edit: &EditItem) -> fmt::Result {
    let id = edit.todo.id;
    writeln!(out, r#"<tr id="todo-{id}" class="todo editing">"#)?;
    writeln!(out, r#"<td colspan="3">"#)?;
    writeln!(
        out,
        r#"<form hx-put="{}" hx-target="closest tr" hx-swap="outerHTML">"#,
        Escaped(&with_filter(&format!("/todos/{id}/_text/"), edit.filter))
    )?;
    writeln!(
        out,
        r#"<input type="text" name="text" value="{}" aria-label="{}" required autofocus>"#,
        Escaped(&edit.todo.text),
        Escaped(ctx.t("Todo"))
    )?;
    writeln!(out, r#"<button type="submit">{}</button>"#, Escaped(ctx.t("Save")))?;
    writeln!(
        out,
        r#"<button type="button" hx-get="{}" hx-target="closest tr" hx-swap="outerHTML">{}</button>"#,
        Escaped(&with_filter(&format!("/todos/{id}/"), edit.filter)),
        Escaped(ctx.t("Cancel"))
    )?;
    writeln!(out, "</form>")?;
    writeln!(out, "</td>")?;
    writeln!(out, "</tr>")
}

fn write_count(out: &mut String, ctx: &ViewContext, count: usize, oob: bool) -> fmt::Result {
    let swap = if oob { r#" hx-swap-oob="true""# } else { "" };
    writeln!(
        out,
        r#"<p id="todo-count" aria-live="polite"{swap}>{}</p>"#,
        Escaped(&ctx.translator.showing(count))
    )
}

/// Append `?filter=` to `path` when a filter is active.
fn with_filter(path: &str, filter: Option<&str>) -> String {
    match filter {
        Some(value) => format!("{path}?filter={value}"),
        None => path.to_string(),
    }
}

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    Escaped(text).to_string()
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['&', '<', '>', '"', '\'']) {
            f.write_str(&rest[..pos])?;
            let entity = match rest.as_bytes()[pos] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            };
            f.write_str(entity)?;
            rest = &rest[pos + 1..];
        }
        f.write_str(rest)
    }
}
