//! Per-request OAuth protocol parameters.
//!
//! Every outbound call carries a fresh nonce/timestamp pair; the provider
//! uses them for replay detection. A pair is never reused, including across
//! retries of the same logical request — each attempt mints a new one.

use rand::RngExt;

/// The only signature method this proxy speaks.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// The OAuth protocol version sent as `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

/// The response format requested from the provider.
pub const RESPONSE_FORMAT: &str = "json";

/// The protocol half of a signed request's parameter set.
///
/// Minted fresh per outbound call via [`ProtocolParams::fresh`] and discarded
/// after the response is relayed. Nothing here is cached or reused.
#[derive(Debug, Clone)]
pub struct ProtocolParams {
    /// Single-use 128-bit random value, rendered as 32 lowercase hex chars.
    pub nonce: String,
    /// Seconds since the Unix epoch at mint time.
    pub timestamp: i64,
    /// The consumer key identifying this application.
    pub consumer_key: String,
}

impl ProtocolParams {
    /// Mint a fresh nonce/timestamp pair for one outbound call.
    ///
    /// The nonce is drawn from the thread-local CSPRNG; the timestamp is the
    /// current wall clock.
    #[must_use]
    pub fn fresh(consumer_key: &str) -> Self {
        let mut rng = rand::rng();
        let mut buf = [0u8; 16];
        rng.fill(&mut buf);
        Self {
            nonce: hex::encode(buf),
            timestamp: chrono::Utc::now().timestamp(),
            consumer_key: consumer_key.to_owned(),
        }
    }

    /// The protocol parameters as key/value pairs, ready to merge with the
    /// application parameters before canonicalization.
    ///
    /// `oauth_signature` is deliberately absent: it is computed over the
    /// merged set and appended only afterwards.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("oauth_consumer_key", self.consumer_key.clone()),
            ("oauth_nonce", self.nonce.clone()),
            ("oauth_signature_method", SIGNATURE_METHOD.to_owned()),
            ("oauth_timestamp", self.timestamp.to_string()),
            ("oauth_version", OAUTH_VERSION.to_owned()),
            ("format", RESPONSE_FORMAT.to_owned()),
        ]
    }
}
