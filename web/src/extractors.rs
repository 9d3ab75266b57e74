//! Custom Axum extractors.
//!
//! - [`HxRequest`]: the htmx request headers
//! - [`TodoPath`]: the todo id captured by the route
//! - [`ViewContext`]: language, translator, CSRF token and the fragment flag
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     TodoPath(id): TodoPath,
//!     ctx: ViewContext,
//! ) -> Result<Response, AppError> {
//!     tracing::info!(%id, language = ctx.language.tag(), "Processing request");
//!     ...
//! }
//! ```

use crate::csrf::CsrfToken;
use crate::error::AppError;
use crate::i18n::negotiate_headers;
use crate::routes::parse_todo_id;
use crate::views::ViewContext;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{HeaderMap, request::Parts},
};
use hypertodo_core::TodoId;
use std::convert::Infallible;

/// Header htmx sets on every request it issues.
pub const HX_REQUEST_HEADER: &str = "HX-Request";

/// Header htmx sets when it reloads a page missing from its history cache.
pub const HX_HISTORY_RESTORE_HEADER: &str = "HX-History-Restore-Request";

fn header_is_true(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// The htmx request headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HxRequest {
    /// `HX-Request: true`
    pub request: bool,
    /// `HX-History-Restore-Request: true`
    pub history_restore: bool,
}

impl HxRequest {
    /// Read the htmx headers of a request.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            request: header_is_true(headers, HX_REQUEST_HEADER),
            history_restore: header_is_true(headers, HX_HISTORY_RESTORE_HEADER),
        }
    }

    /// Whether to answer with a fragment rather than a full page.
    ///
    /// A history restore is swapped into `<body>`, so it needs the page.
    #[must_use]
    pub const fn wants_fragment(self) -> bool {
        self.request && !self.history_restore
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Todo id from the `:id` path segment.
///
/// Non-numeric segments are answered with 404 and ids that overflow `u64`
/// with 500 (see [`RoutingError`](crate::RoutingError)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoPath(pub TodoId);

#[async_trait]
impl<S> FromRequestParts<S> for TodoPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::internal("Extracting todo id failed")
                    .with_source(anyhow::Error::new(rejection))
            })?;
        Ok(Self(parse_todo_id(&raw)?))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ViewContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let language = negotiate_headers(&parts.headers);
        let csrf_token = parts.extensions.get::<CsrfToken>().map(|t| t.0.clone());
        let hx = HxRequest::from_request_parts(parts, state).await?;

        Ok(Self {
            language,
            translator: language.translator(),
            csrf_token,
            partial: hx.wants_fragment(),
        })
    }
}
