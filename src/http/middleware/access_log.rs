//! Request logging middleware.
//!
//! Emits one structured log line per completed request with method, path,
//! status, duration, and the correlation ID set by the request-id layer.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::http::middleware::request_id::RequestId;

pub async fn access_log(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_owned())
        .unwrap_or_default();

    let response = next.run(request).await;

    let duration_ms = (start.elapsed().as_secs_f64() * 100_000.0).round() / 100.0;
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms,
        "request completed"
    );

    response
}
