//! Proxy request router.
//!
//! The proxy exposes a single command endpoint, so routing is a closed
//! path/method match rather than a parse: `OPTIONS` anywhere is a CORS
//! preflight, `POST` on the proxy path is the command endpoint, health
//! probes are intercepted, and everything else is a 404.

use nutrigate_model::ProxyError;

/// The command endpoint path.
///
/// Kept identical to the path the web and mobile clients already call.
pub const PROXY_PATH: &str = "/functions/v1/fatsecret-proxy";

/// The resolved destination of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `POST` on the command endpoint.
    Proxy,
    /// CORS preflight (`OPTIONS` on any path).
    Preflight,
    /// Health probe.
    Health,
}

/// Resolve an inbound request to a [`Route`].
///
/// Any path/method combination outside the closed set fails with a 404-class
/// error.
pub fn resolve_route(method: &http::Method, path: &str) -> Result<Route, ProxyError> {
    if *method == http::Method::OPTIONS {
        return Ok(Route::Preflight);
    }
    if *method == http::Method::POST && path == PROXY_PATH {
        return Ok(Route::Proxy);
    }
    if is_health_check(method, path) {
        return Ok(Route::Health);
    }
    Err(ProxyError::not_found(format!("no route for {method} {path}")))
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}
