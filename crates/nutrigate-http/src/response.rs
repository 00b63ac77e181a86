//! Proxy response serialization, error formatting, and CORS headers.

use bytes::Bytes;

use nutrigate_model::ProxyError;

use crate::body::ProxyResponseBody;

/// Content type for proxy JSON responses.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Serialize a proxy error into a JSON response body: `{"error": "<msg>"}`.
#[must_use]
pub fn error_to_json(error: &ProxyError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "error": error.message,
    }))
    .expect("JSON serialization of error cannot fail")
}

/// Convert a [`ProxyError`] into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &ProxyError) -> http::Response<ProxyResponseBody> {
    let json = error_to_json(error);

    http::Response::builder()
        .status(error.status_code)
        .header("content-type", CONTENT_TYPE_JSON)
        .body(ProxyResponseBody::from_json(json))
        .expect("valid error response")
}

/// Build a response relaying an upstream status and body verbatim.
///
/// The upstream payload is passed through untouched — including provider
/// error bodies — so callers can see provider-level rejection reasons.
#[must_use]
pub fn relay_response(
    status: http::StatusCode,
    content_type: Option<&str>,
    body: Bytes,
) -> http::Response<ProxyResponseBody> {
    http::Response::builder()
        .status(status)
        .header("content-type", content_type.unwrap_or(CONTENT_TYPE_JSON))
        .body(ProxyResponseBody::from_bytes(body))
        .expect("valid relay response")
}

/// Produce a CORS preflight response: 200, empty body, permissive headers.
#[must_use]
pub fn cors_preflight_response() -> http::Response<ProxyResponseBody> {
    let mut response = http::Response::builder()
        .status(http::StatusCode::OK)
        .body(ProxyResponseBody::empty())
        .expect("static CORS response should be valid");
    apply_cors_headers(response.headers_mut());
    response
}

/// Produce a health check response.
#[must_use]
pub fn health_response() -> http::Response<ProxyResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE_JSON)
        .body(ProxyResponseBody::from_bytes(
            r#"{"status":"running","service":"fatsecret-proxy"}"#,
        ))
        .expect("static health response should be valid")
}

/// Apply the permissive CORS headers every response carries.
pub fn apply_cors_headers(headers: &mut http::HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        http::HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        http::HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        http::HeaderValue::from_static("authorization, x-client-info, apikey, content-type"),
    );
}
