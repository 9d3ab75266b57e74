//! CSRF protection (double-submit cookie).
//!
//! Every response to a request without a valid `csrf_token` cookie sets
//! one. State-changing requests (anything but GET, HEAD, OPTIONS, TRACE)
//! must echo the cookie's token in the `X-CSRF-Token` header or in the
//! `csrf_token` field of a urlencoded form body; otherwise they are
//! rejected with 403 before any handler runs.
//!
//! Handlers see the token as the [`CsrfToken`] request extension, which the
//! [`ViewContext`](crate::ViewContext) extractor picks up so templates can
//! embed it.
//!
//! # Example
//!
//! ```ignore
//! use hypertodo_web::csrf::csrf_layer;
//!
//! let app = Router::new()
//!     .route("/todos/", post(create_todo))
//!     .layer(csrf_layer(false));
//! ```

use crate::cookies::{SameSite, SetCookie, cookie_value};
use crate::error::AppError;
use axum::{
    body::Body,
    extract::Request,
    http::{Method, header},
    response::{IntoResponse, Response},
};
use base64::Engine;
use rand::RngCore;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Cookie holding the token.
pub const CSRF_COOKIE: &str = "csrf_token";

/// Header carrying the token on scripted requests.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Form field carrying the token on plain form posts.
pub const CSRF_FIELD: &str = "csrf_token";

/// Largest form body inspected for the token.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Length of a base64url-encoded 32 byte token.
const TOKEN_LEN: usize = 43;

/// The CSRF token of the current request, as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(pub String);

/// Generate a 256-bit random token encoded as base64url (43 characters).
#[must_use]
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let mut random_bytes = [0u8; 32];
    rng.fill_bytes(&mut random_bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

const fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

/// Find the submitted token, buffering a form body if needed.
///
/// Returns the request (with its body restored) and the token, if any.
async fn submitted_token(req: Request) -> Result<(Request, Option<String>), AppError> {
    if let Some(token) = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        let token = token.to_string();
        return Ok((req, Some(token)));
    }

    if !is_form(&req) {
        return Ok((req, None));
    }

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| AppError::bad_request("Form body unreadable").with_source(e.into()))?;

    let token = serde_urlencoded::from_bytes::<Vec<(String, String)>>(&bytes)
        .ok()
        .and_then(|fields| {
            fields
                .into_iter()
                .find(|(name, _)| name == CSRF_FIELD)
                .map(|(_, value)| value)
        });

    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

/// Create a layer enforcing CSRF tokens on state-changing requests.
///
/// `secure` marks the cookie `Secure` (HTTPS deployments).
#[must_use]
pub const fn csrf_layer(secure: bool) -> CsrfLayer {
    CsrfLayer { secure }
}

/// Layer for CSRF protection.
#[derive(Clone, Copy, Debug)]
pub struct CsrfLayer {
    secure: bool,
}

impl<S> Layer<S> for CsrfLayer {
    type Service = CsrfMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CsrfMiddleware {
            inner,
            secure: self.secure,
        }
    }
}

/// Middleware service for CSRF protection.
#[derive(Clone, Debug)]
pub struct CsrfMiddleware<S> {
    inner: S,
    secure: bool,
}

impl<S> Service<Request> for CsrfMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // The ready service is the one we were polled for; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let secure = self.secure;

        Box::pin(async move {
            let existing = cookie_value(req.headers(), CSRF_COOKIE)
                .filter(|t| is_well_formed(t))
                .map(str::to_owned);

            let mut req = req;
            if !is_safe_method(req.method()) {
                let (restored, submitted) = match submitted_token(req).await {
                    Ok(found) => found,
                    Err(err) => return Ok(err.into_response()),
                };
                req = restored;

                let valid = match (&existing, &submitted) {
                    (Some(expected), Some(got)) => {
                        constant_time_eq::constant_time_eq(expected.as_bytes(), got.as_bytes())
                    }
                    _ => false,
                };
                if !valid {
                    tracing::warn!(
                        method = %req.method(),
                        uri = %req.uri(),
                        has_cookie = existing.is_some(),
                        has_token = submitted.is_some(),
                        "CSRF token missing or invalid"
                    );
                    crate::metrics::csrf_rejected();
                    return Ok(AppError::forbidden("CSRF token missing or invalid").into_response());
                }
            }

            let fresh = existing.is_none();
            let token = existing.unwrap_or_else(generate_token);
            req.extensions_mut().insert(CsrfToken(token.clone()));

            let mut response = inner.call(req).await?;

            if fresh {
                let cookie = SetCookie::new(CSRF_COOKIE, &token)
                    .same_site(SameSite::Strict)
                    .http_only()
                    .secure(secure);
                if let Some(value) = cookie.to_header_value() {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }

            Ok(response)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{
        Extension, Router,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    const TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(token): Extension<CsrfToken>| async move { token.0 })
                    .post(|body: String| async move { body }),
            )
            .layer(csrf_layer(false))
    }

    #[test]
    fn test_generated_tokens_are_well_formed_and_distinct() {
        let a = generate_token();
        let b = generate_token();
        assert!(is_well_formed(&a));
        assert_eq!(a.len(), TOKEN_LEN);
        assert_ne!(a, b);
        assert!(is_well_formed(TOKEN));
        assert!(!is_well_formed("short"));
    }

    #[tokio::test]
    async fn test_safe_request_gets_cookie() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("cookie should be set")
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("csrf_token="));
        assert!(cookie.contains("SameSite=Strict"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(cookie.contains(std::str::from_utf8(&body).unwrap()));
    }

    #[tokio::test]
    async fn test_existing_cookie_is_reused() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, format!("csrf_token={TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], TOKEN.as_bytes());
    }

    #[tokio::test]
    async fn test_post_without_token_is_forbidden() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .header(header::COOKIE, format!("csrf_token={TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_post_with_mismatched_header_is_forbidden() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .header(header::COOKIE, format!("csrf_token={TOKEN}"))
                    .header(CSRF_HEADER, generate_token())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_post_with_header_token_passes() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .header(header::COOKIE, format!("csrf_token={TOKEN}"))
                    .header(CSRF_HEADER, TOKEN)
                    .body(Body::from("payload"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_with_form_token_passes_and_keeps_body() {
        let form = format!("new-todo=milk&csrf_token={TOKEN}");
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .header(header::COOKIE, format!("csrf_token={TOKEN}"))
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], form.as_bytes());
    }

    #[tokio::test]
    async fn test_token_without_cookie_is_forbidden() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .header(CSRF_HEADER, TOKEN)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
