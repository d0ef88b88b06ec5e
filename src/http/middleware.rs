//! Request metrics middleware.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id_of;
use crate::observability::metrics;

/// Record count and latency per matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let request_id = request_id_of(&request);
    let method = request.method().clone();

    let response = next.run(request).await;
    let status = response.status();

    metrics::record_request(&route, status.as_u16(), start);
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        route = %route,
        status = %status,
        elapsed = ?start.elapsed(),
        "Request handled"
    );
    response
}
