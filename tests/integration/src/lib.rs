//! Integration tests for the NutriGate proxy server.
//!
//! These tests require a running proxy at `localhost:8787` (any credentials
//! will do for the routing and validation tests; the live search test also
//! needs real provider credentials). They are marked `#[ignore]` so they
//! don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p nutrigate-integration -- --ignored
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the proxy server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("PROXY_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8787".to_owned())
}

/// The command endpoint URL.
#[must_use]
pub fn proxy_url() -> String {
    format!("{}/functions/v1/fatsecret-proxy", endpoint_url())
}

/// Create an HTTP client pointing at the local proxy.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

mod test_proxy;
