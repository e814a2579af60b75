//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Span, debug_span, info, warn};

/// Logs request method, path, status, and duration.
///
/// Query strings are never logged and public share tokens are masked.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = loggable_path(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(method = %method, path = %path, status, duration_ms, "HTTP request failed");
    } else {
        info!(method = %method, path = %path, status, duration_ms, "HTTP request");
    }

    response
}

/// Span for `TraceLayer`, carrying the same masked path as the request log.
pub fn request_span(request: &Request) -> Span {
    debug_span!(
        "request",
        method = %request.method(),
        path = %loggable_path(request),
        version = ?request.version(),
    )
}

/// Request path with the share token masked and the query string dropped.
fn loggable_path(request: &Request) -> String {
    redact_share_token(request.uri().path())
}

/// Masks the token segment of public share paths.
fn redact_share_token(path: &str) -> String {
    const PREFIX: &str = "/api/document-shares/";
    let Some(rest) = path.strip_prefix(PREFIX) else {
        return path.to_string();
    };
    let (segment, tail) = rest.split_once('/').unwrap_or((rest, ""));
    if segment == "by-id" || segment == "batch-revoke" || segment.parse::<uuid::Uuid>().is_ok() {
        return path.to_string();
    }
    if tail.is_empty() {
        format!("{PREFIX}***")
    } else {
        format!("{PREFIX}***/{tail}")
    }
}
