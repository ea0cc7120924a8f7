//! Response headers middleware.
//!
//! The bridge serves a local desktop UI over loopback HTTP, so the headers
//! here are about keeping responses uncacheable and unframeable rather
//! than full web hardening (no HSTS on plain loopback).

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Middleware that adds baseline headers to all responses.
///
/// - **Cache-Control: no-store** — key values and credentials must never
///   land in an HTTP cache.
/// - **X-Content-Type-Options: nosniff** — responses are JSON or static
///   assets with declared types.
/// - **X-Frame-Options: DENY** — the UI is never embedded.
/// - **Content-Security-Policy** — same-origin only; the UI bundle ships
///   with the bridge.
pub async fn response_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             object-src 'none'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    response
}
