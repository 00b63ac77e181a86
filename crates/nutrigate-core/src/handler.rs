//! The proxy pipeline: normalize, sign, forward, relay.
//!
//! Each inbound command runs the straight-line sequence below inside its own
//! task; every intermediate value (nonce, timestamp, base string, signature)
//! lives only for the duration of that one call.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use nutrigate_http::ProxyHandler;
use nutrigate_http::body::ProxyResponseBody;
use nutrigate_http::response::relay_response;
use nutrigate_model::{ProxyCommand, ProxyError};
use nutrigate_oauth::{
    ConsumerCredentials, ProtocolParams, canonical_param_string, sign, signature_base_string,
};

use crate::config::{ConfigError, ProxyConfig};
use crate::forwarder::{UpstreamForwarder, UpstreamResponse, encode_form};
use crate::request::request_params;

/// The proxy business logic: holds the immutable credentials and the
/// upstream forwarder, and drives one signing pipeline per command.
#[derive(Debug, Clone)]
pub struct FatSecretProxy {
    credentials: ConsumerCredentials,
    forwarder: UpstreamForwarder,
}

impl FatSecretProxy {
    /// Build the proxy from process configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, ConfigError> {
        let forwarder =
            UpstreamForwarder::new(config.upstream_url.clone(), config.upstream_timeout)?;
        Ok(Self::with_parts(config.credentials.clone(), forwarder))
    }

    /// Build the proxy from explicit parts.
    #[must_use]
    pub fn with_parts(credentials: ConsumerCredentials, forwarder: UpstreamForwarder) -> Self {
        Self {
            credentials,
            forwarder,
        }
    }

    /// Run one command through the full pipeline and return the upstream
    /// reply.
    pub async fn execute(&self, command: &ProxyCommand) -> Result<UpstreamResponse, ProxyError> {
        let protocol = ProtocolParams::fresh(self.credentials.consumer_key());
        debug!(
            operation = %command.operation(),
            nonce = %protocol.nonce,
            timestamp = protocol.timestamp,
            "signing upstream request"
        );

        let signed = sign_request(
            &self.credentials,
            &protocol,
            self.forwarder.endpoint(),
            command,
        );
        let refs: Vec<(&str, &str)> = signed.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let body = encode_form(&refs);

        self.forwarder.send_form(body).await
    }
}

impl ProxyHandler for FatSecretProxy {
    fn handle_command(
        &self,
        command: ProxyCommand,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<ProxyResponseBody>, ProxyError>> + Send>>
    {
        let proxy = self.clone();
        Box::pin(async move {
            let upstream = proxy.execute(&command).await?;
            Ok(relay_response(
                upstream.status,
                upstream.content_type.as_deref(),
                upstream.body,
            ))
        })
    }
}

/// Build the signature base string for one request attempt.
///
/// Deterministic given its inputs; two attempts differ only through the
/// fresh nonce/timestamp inside `protocol`.
#[must_use]
pub fn request_base_string(
    protocol: &ProtocolParams,
    endpoint: &str,
    command: &ProxyCommand,
) -> String {
    let params = request_params(protocol, command);
    let refs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let canonical = canonical_param_string(&refs);
    signature_base_string("POST", endpoint, &canonical)
}

/// Build the complete outgoing parameter set for one request attempt:
/// the canonical parameters plus the `oauth_signature` computed over them.
#[must_use]
pub fn sign_request(
    credentials: &ConsumerCredentials,
    protocol: &ProtocolParams,
    endpoint: &str,
    command: &ProxyCommand,
) -> Vec<(&'static str, String)> {
    let base = request_base_string(protocol, endpoint, command);
    let signature = sign(credentials, &base);

    let mut params = request_params(protocol, command);
    params.push(("oauth_signature", signature));
    params
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use super::*;

    fn test_credentials() -> ConsumerCredentials {
        ConsumerCredentials::new("demo-key", "demo-secret").expect("test credentials")
    }

    fn fixed_protocol() -> ProtocolParams {
        ProtocolParams {
            nonce: "00112233445566778899aabbccddeeff".to_owned(),
            timestamp: 1_700_000_000,
            consumer_key: "demo-key".to_owned(),
        }
    }

    fn search_command() -> ProxyCommand {
        ProxyCommand::FoodsSearch {
            search_expression: "banana".to_owned(),
        }
    }

    fn lookup<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_should_build_search_base_string_with_sorted_encoded_pairs() {
        let base = request_base_string(
            &fixed_protocol(),
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            &search_command(),
        );

        assert_eq!(
            base,
            concat!(
                "POST&https%3A%2F%2Fplatform.fatsecret.com%2Frest%2Fserver.api&",
                "format%3Djson",
                "%26max_results%3D10",
                "%26method%3Dfoods.search",
                "%26oauth_consumer_key%3Ddemo-key",
                "%26oauth_nonce%3D00112233445566778899aabbccddeeff",
                "%26oauth_signature_method%3DHMAC-SHA1",
                "%26oauth_timestamp%3D1700000000",
                "%26oauth_version%3D1.0",
                "%26search_expression%3Dbanana",
            )
        );
    }

    #[test]
    fn test_should_build_food_get_base_string_without_search_fields() {
        let command = ProxyCommand::FoodGet {
            food_id: "12345".to_owned(),
        };
        let base = request_base_string(
            &fixed_protocol(),
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            &command,
        );

        assert!(base.starts_with("POST&https%3A%2F%2Fplatform.fatsecret.com%2Frest%2Fserver.api&"));
        assert!(base.contains("food_id%3D12345"));
        assert!(base.contains("method%3Dfood.get"));
        assert!(!base.contains("search_expression"));
        assert!(!base.contains("max_results"));
    }

    #[test]
    fn test_should_sign_deterministically_for_a_fixed_attempt() {
        let creds = test_credentials();
        let first = sign_request(
            &creds,
            &fixed_protocol(),
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            &search_command(),
        );
        let second = sign_request(
            &creds,
            &fixed_protocol(),
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            &search_command(),
        );
        assert_eq!(
            lookup(&first, "oauth_signature"),
            lookup(&second, "oauth_signature")
        );
    }

    #[test]
    fn test_should_produce_fresh_nonce_and_signature_per_attempt() {
        let creds = test_credentials();
        let command = search_command();

        let first = sign_request(
            &creds,
            &ProtocolParams::fresh(creds.consumer_key()),
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            &command,
        );
        let second = sign_request(
            &creds,
            &ProtocolParams::fresh(creds.consumer_key()),
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            &command,
        );

        assert_ne!(lookup(&first, "oauth_nonce"), lookup(&second, "oauth_nonce"));
        assert_ne!(
            lookup(&first, "oauth_signature"),
            lookup(&second, "oauth_signature")
        );
    }

    #[test]
    fn test_should_append_signature_after_canonical_set() {
        let signed = sign_request(
            &test_credentials(),
            &fixed_protocol(),
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            &search_command(),
        );
        let (last_key, last_value) = signed.last().expect("signed set is non-empty");
        assert_eq!(*last_key, "oauth_signature");
        assert!(!last_value.is_empty());
        // Exactly one signature in the set.
        let count = signed.iter().filter(|(k, _)| *k == "oauth_signature").count();
        assert_eq!(count, 1);
    }

    /// One-shot upstream stub returning a canned 200 JSON reply and handing
    /// back the raw request it received.
    async fn spawn_upstream_stub(body: &'static str) -> (SocketAddr, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener addr");
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };

            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let Ok(n) = stream.read(&mut chunk).await else {
                    break;
                };
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                    let content_length = headers
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= pos + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len(),
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
        });

        (addr, rx)
    }

    #[tokio::test]
    async fn test_should_forward_signed_command_and_relay_reply() {
        let (addr, request_rx) = spawn_upstream_stub(r#"{"foods":{"food":[]}}"#).await;

        let forwarder = UpstreamForwarder::new(
            format!("http://{addr}/rest/server.api"),
            Duration::from_secs(5),
        )
        .expect("build forwarder");
        let proxy = FatSecretProxy::with_parts(test_credentials(), forwarder);

        let response = proxy.execute(&search_command()).await.expect("execute");
        assert_eq!(response.status, http::StatusCode::OK);
        assert_eq!(&response.body[..], br#"{"foods":{"food":[]}}"#);

        let request = request_rx.await.expect("captured request");
        let body = request
            .split("\r\n\r\n")
            .nth(1)
            .expect("request has a body");
        assert!(body.contains("method=foods.search"));
        assert!(body.contains("search_expression=banana"));
        assert!(body.contains("max_results=10"));
        assert!(body.contains("oauth_nonce="));
        assert!(body.contains("oauth_signature="));
        assert!(body.contains("oauth_signature_method=HMAC-SHA1"));
    }

    #[tokio::test]
    async fn test_should_relay_through_the_handler_trait() {
        let (addr, _rx) = spawn_upstream_stub("{}").await;

        let forwarder = UpstreamForwarder::new(
            format!("http://{addr}/rest/server.api"),
            Duration::from_secs(5),
        )
        .expect("build forwarder");
        let proxy = FatSecretProxy::with_parts(test_credentials(), forwarder);

        let response = proxy.handle_command(search_command()).await.expect("handle");
        assert_eq!(response.status(), http::StatusCode::OK);
    }
}
