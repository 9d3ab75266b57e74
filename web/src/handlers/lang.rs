//! Language selection.
//!
//! `GET /lang/?lang=fr` (the selector links) and `POST /lang/` with a
//! `lang` form field both remember the choice in the `lang` cookie for a
//! year and send the browser back where it came from.

use crate::WebResult;
use crate::cookies::{SameSite, SetCookie};
use crate::error::AppError;
use crate::i18n::{LANG_COOKIE, Language};
use crate::state::AppState;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

/// Lifetime of the language cookie in seconds (one year).
pub const LANG_COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// `lang` parameter of the selector.
#[derive(Debug, Default, Deserialize)]
pub struct LangParams {
    /// Language tag (`en`, `fr`)
    #[serde(default)]
    pub lang: String,
}

/// Select the language from the query string.
///
/// # Errors
///
/// 404 when the language is not supported.
#[allow(clippy::unused_async)]
pub async fn select_from_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LangParams>,
) -> WebResult<Response> {
    select(&state, &headers, &params.lang)
}

/// Select the language from a posted form.
///
/// # Errors
///
/// 404 when the language is not supported.
#[allow(clippy::unused_async)]
pub async fn select_from_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<LangParams>,
) -> WebResult<Response> {
    select(&state, &headers, &params.lang)
}

fn select(state: &AppState, headers: &HeaderMap, tag: &str) -> WebResult<Response> {
    let Some(language) = Language::from_tag(tag) else {
        return Err(AppError::not_found("Language", format!("{tag:?}")));
    };

    let cookie = SetCookie::new(LANG_COOKIE, language.tag())
        .max_age(LANG_COOKIE_MAX_AGE)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies)
        .to_header_value()
        .ok_or_else(|| AppError::internal("Building language cookie failed"))?;
    let location = HeaderValue::from_str(&return_path(headers))
        .map_err(|e| AppError::internal("Building redirect failed").with_source(e.into()))?;

    tracing::info!(language = language.tag(), location = ?location, "Language selected");

    Ok((
        StatusCode::SEE_OTHER,
        [(header::SET_COOKIE, cookie), (header::LOCATION, location)],
    )
        .into_response())
}

/// Path of the `Referer` when it points at this site, `/` otherwise.
fn return_path(headers: &HeaderMap) -> String {
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| referer.parse::<Uri>().ok())
        .filter(|uri| {
            uri.authority()
                .is_none_or(|authority| Some(authority.as_str()) == host)
        })
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}
