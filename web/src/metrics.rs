//! Metrics for observability and monitoring.
//!
//! Counters are recorded through the `metrics` facade; without an installed
//! recorder (e.g. in tests) they are no-ops. The server installs a
//! Prometheus exporter when configured to.

use axum::http::{Method, StatusCode};
use metrics::{counter, describe_counter};

/// HTTP requests by method and status.
pub const HTTP_REQUESTS_TOTAL: &str = "hypertodo_http_requests_total";
/// Todos created.
pub const TODOS_CREATED_TOTAL: &str = "hypertodo_todos_created_total";
/// Todo updates (text or completion).
pub const TODOS_UPDATED_TOTAL: &str = "hypertodo_todos_updated_total";
/// Todos deleted.
pub const TODOS_DELETED_TOTAL: &str = "hypertodo_todos_deleted_total";
/// Requests rejected by the CSRF layer.
pub const CSRF_REJECTIONS_TOTAL: &str = "hypertodo_csrf_rejections_total";

/// Register descriptions for every metric.
///
/// Call once after installing a recorder.
pub fn register_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "HTTP requests by method and status");
    describe_counter!(TODOS_CREATED_TOTAL, "Todos created");
    describe_counter!(TODOS_UPDATED_TOTAL, "Todo updates by field");
    describe_counter!(TODOS_DELETED_TOTAL, "Todos deleted");
    describe_counter!(CSRF_REJECTIONS_TOTAL, "Requests rejected for a missing or invalid CSRF token");
}

/// Record a finished request.
pub fn request_completed(method: &Method, status: StatusCode) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

/// Record a created todo.
pub fn todo_created() {
    counter!(TODOS_CREATED_TOTAL).increment(1);
}

/// Record an updated todo; `field` is `"text"` or `"done"`.
pub fn todo_updated(field: &'static str) {
    counter!(TODOS_UPDATED_TOTAL, "field" => field).increment(1);
}

/// Record a deleted todo.
pub fn todo_deleted() {
    counter!(TODOS_DELETED_TOTAL).increment(1);
}

/// Record a CSRF rejection.
pub fn csrf_rejected() {
    counter!(CSRF_REJECTIONS_TOTAL).increment(1);
}
