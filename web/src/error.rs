//! Error types for web handlers.
//!
//! This module defines the error type that bridges store, rendering and
//! routing failures to HTTP responses, implementing Axum's `IntoResponse`
//! trait.

use crate::routes::RoutingError;
use crate::views::RenderError;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use hypertodo_core::TodoError;
use std::fmt;

/// Application error type for web handlers.
///
/// The response body is only the canonical reason phrase of the status;
/// the message and source are for the logs.
///
/// # Examples
///
/// ```ignore
/// async fn handler(TodoPath(id): TodoPath) -> Result<Response, AppError> {
///     let todo = state.store.get_by_id(id)
///         .map_err(|_| AppError::not_found("Todo", id))?;
///     render(&state, TODO_LIST_ITEM, &data, &ctx)
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (for logs)
    message: String,
    /// Error code (for logs and tests)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 404 Not Found error for a path no route serves.
    #[must_use]
    pub fn no_route(path: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("no route for {path}"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// HTTP status of the response this error produces.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                let chain = format!("{source:#}");
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %chain,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        } else {
            tracing::debug!(status = %self.status, message = %self.message, "Request rejected");
        }

        let body = self.status.canonical_reason().unwrap_or("Error");

        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

/// Store failures are fatal to the request.
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        Self::from(anyhow::Error::new(err))
    }
}

/// Rendering failures are fatal to the request.
impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        Self::internal("Rendering failed").with_source(err.into())
    }
}

impl From<RoutingError> for AppError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::NotATodoId(raw) => Self::no_route(format!("todo {raw:?}")),
            err @ RoutingError::InvalidId { .. } => {
                Self::internal("Extracting todo id failed").with_source(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypertodo_core::TodoId;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Todo", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Todo with id 123 not found");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_errors_are_internal() {
        let err = AppError::from(TodoError::NotFound(TodoId::new(4)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_render_errors_are_internal() {
        let err = AppError::from(RenderError::UnknownTemplate("nope.html".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_routing_errors() {
        let not_numeric = AppError::from(RoutingError::NotATodoId("abc".to_string()));
        assert_eq!(not_numeric.status(), StatusCode::NOT_FOUND);

        let overflow = "99999999999999999999999"
            .parse::<u64>()
            .map_err(|source| RoutingError::InvalidId {
                raw: "99999999999999999999999".to_string(),
                source,
            });
        let Err(err) = overflow else {
            unreachable!("value overflows u64")
        };
        assert_eq!(
            AppError::from(err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_response_body_is_status_text() {
        let response = AppError::internal("secret details").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        assert_eq!(&body[..], b"Internal Server Error");
    }
}
