//! Proxy HTTP service implementing the hyper `Service` trait.
//!
//! Each inbound request is handled independently:
//! 1. CORS preflight interception (`OPTIONS`)
//! 2. Health probe interception
//! 3. Routing
//! 4. Body collection and command parsing
//! 5. Dispatch to the [`ProxyHandler`]
//!
//! No state is shared between calls except the handler behind an `Arc`.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use tracing::{debug, warn};

use nutrigate_model::{ProxyCommand, ProxyError};

use crate::body::ProxyResponseBody;
use crate::dispatch::{ProxyHandler, dispatch_command};
use crate::response::{
    apply_cors_headers, cors_preflight_response, error_to_response, health_response,
};
use crate::router::{Route, resolve_route};

/// Hyper `Service` implementation for the proxy.
///
/// Wraps a [`ProxyHandler`] implementation and drives the per-request
/// pipeline from raw HTTP to a relayed response.
#[derive(Debug)]
pub struct ProxyHttpService<H: ProxyHandler> {
    handler: Arc<H>,
}

impl<H: ProxyHandler> ProxyHttpService<H> {
    /// Create a new `ProxyHttpService`.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }
}

impl<H: ProxyHandler> Clone for ProxyHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: ProxyHandler> hyper::service::Service<http::Request<Incoming>> for ProxyHttpService<H> {
    type Response = http::Response<ProxyResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &request_id).await;
            let response = add_common_headers(response, &request_id);
            Ok(response)
        })
    }
}

/// Process a single inbound request through the full pipeline.
async fn process_request<H: ProxyHandler>(
    req: http::Request<Incoming>,
    handler: &H,
    request_id: &str,
) -> http::Response<ProxyResponseBody> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    debug!(%method, %path, request_id, "processing proxy request");

    // 1. Route (also intercepts preflight and health probes).
    let route = match resolve_route(&method, &path) {
        Ok(route) => route,
        Err(err) => {
            warn!(%method, %path, error = %err, request_id, "no route for request");
            return error_to_response(&err);
        }
    };

    match route {
        Route::Preflight => cors_preflight_response(),
        Route::Health => health_response(),
        Route::Proxy => handle_proxy_request(req, handler, request_id).await,
    }
}

/// Collect the body, parse the command, and dispatch it.
async fn handle_proxy_request<H: ProxyHandler>(
    req: http::Request<Incoming>,
    handler: &H,
    request_id: &str,
) -> http::Response<ProxyResponseBody> {
    let (_parts, incoming) = req.into_parts();

    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, request_id, "failed to read request body");
            return error_to_response(&err);
        }
    };

    let command = match ProxyCommand::from_json(&body) {
        Ok(command) => command,
        Err(err) => {
            debug!(error = %err, request_id, "rejected proxy command");
            return error_to_response(&err);
        }
    };

    match dispatch_command(handler, command).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "proxy command returned error");
            error_to_response(&err)
        }
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body(incoming: Incoming) -> Result<Bytes, ProxyError> {
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ProxyError::internal_error(format!("failed to read request body: {e}")))
}

/// Add common response headers to every proxy response.
fn add_common_headers(
    mut response: http::Response<ProxyResponseBody>,
    request_id: &str,
) -> http::Response<ProxyResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }
    headers.insert("server", http::HeaderValue::from_static("nutrigate"));
    apply_cors_headers(headers);

    response
}
