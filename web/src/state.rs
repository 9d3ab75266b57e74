//! Application state for Axum handlers.

use crate::views::{HtmlRenderer, Renderer};
use hypertodo_core::TodoStore;
use std::fmt;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloning is cheap: the store and renderer are behind `Arc`s, so every
/// handler works on the same todos.
///
/// # Examples
///
/// ```
/// use hypertodo_core::InMemoryTodoStore;
/// use hypertodo_web::AppState;
/// use std::sync::Arc;
///
/// let state = AppState::new(Arc::new(InMemoryTodoStore::new())).with_secure_cookies(true);
/// assert!(state.secure_cookies);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Todo storage
    pub store: Arc<dyn TodoStore>,
    /// Template renderer
    pub renderer: Arc<dyn Renderer>,
    /// Mark cookies `Secure` (serve over HTTPS only)
    pub secure_cookies: bool,
}

impl AppState {
    /// State using `store` and the built-in HTML renderer.
    #[must_use]
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            renderer: Arc::new(HtmlRenderer::new()),
            secure_cookies: false,
        }
    }

    /// Replace the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set whether cookies carry the `Secure` attribute.
    #[must_use]
    pub const fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}
