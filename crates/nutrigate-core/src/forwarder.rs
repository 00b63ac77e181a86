//! Upstream forwarder: form serialization and the outbound POST.
//!
//! The forwarder relays whatever the provider returns — success or a
//! provider-level rejection — verbatim. Only transport failures (DNS,
//! connect, timeout) become proxy errors, and they are never retried: a
//! retry would need a fresh nonce/timestamp pair and is the caller's call.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};

use nutrigate_model::ProxyError;

use crate::config::ConfigError;

/// Content type of the outbound request body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An upstream reply, relayed opaquely to the caller.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// The upstream HTTP status.
    pub status: http::StatusCode,
    /// The upstream `Content-Type`, if any.
    pub content_type: Option<String>,
    /// The raw upstream body.
    pub body: Bytes,
}

/// Issues signed requests to the fixed upstream endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamForwarder {
    client: reqwest::Client,
    endpoint: String,
}

impl UpstreamForwarder {
    /// Create a forwarder with a bounded per-request timeout.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// The upstream endpoint URL. The signature base string must use this
    /// exact value.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST an encoded form body upstream and relay the reply.
    pub async fn send_form(&self, form_body: String) -> Result<UpstreamResponse, ProxyError> {
        debug!(endpoint = %self.endpoint, "forwarding signed request upstream");

        let response = self
            .client
            .post(&self.endpoint)
            .header("content-type", FORM_CONTENT_TYPE)
            .body(form_body)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "upstream transport failure");
                let message = if e.is_timeout() {
                    format!("upstream request timed out: {e}")
                } else {
                    format!("upstream request failed: {e}")
                };
                ProxyError::upstream_unavailable(message).with_source(e)
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);

        let body = response.bytes().await.map_err(|e| {
            ProxyError::upstream_unavailable(format!("failed to read upstream response: {e}"))
                .with_source(e)
        })?;

        debug!(status = %status, bytes = body.len(), "relaying upstream response");

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Serialize the final signed parameter set as a form body.
///
/// Form encoding (`+` for spaces) is the transport encoding only; the
/// signature was computed over the RFC 3986 canonical string, and the
/// provider decodes the form before re-canonicalizing.
#[must_use]
pub fn encode_form(params: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
