//! Signature base string construction and HMAC-SHA1 signing.
//!
//! The base string has the three-part form:
//!
//! ```text
//! UPPERCASE_METHOD & enc(endpoint_url) & enc(canonical_param_string)
//! ```
//!
//! and the signature is `Base64(HMAC-SHA1(key, base_string))` where the key
//! is `enc(consumer_secret) + "&"` — the trailing `&` marks the empty token
//! secret of the two-legged flow.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;

use crate::canonical::percent_encode;
use crate::credentials::ConsumerCredentials;

type HmacSha1 = Hmac<Sha1>;

/// Assemble the signature base string.
///
/// Pure and deterministic: the same method, endpoint, and canonical
/// parameter string always produce the same output. Freshness comes from the
/// nonce/timestamp already embedded in the canonical string, not from this
/// function.
///
/// # Examples
///
/// ```
/// use nutrigate_oauth::signer::signature_base_string;
///
/// let base = signature_base_string("post", "https://example.com/api", "a=1&b=2");
/// assert_eq!(base, "POST&https%3A%2F%2Fexample.com%2Fapi&a%3D1%26b%3D2");
/// ```
#[must_use]
pub fn signature_base_string(
    http_method: &str,
    endpoint_url: &str,
    canonical_params: &str,
) -> String {
    format!(
        "{}&{}&{}",
        http_method.to_uppercase(),
        percent_encode(endpoint_url),
        percent_encode(canonical_params)
    )
}

/// Derive the HMAC key from the consumer credentials.
///
/// Two-legged OAuth has no token secret, so the segment after the `&` is
/// empty — but the `&` itself is still required.
#[must_use]
pub fn signing_key(credentials: &ConsumerCredentials) -> String {
    format!("{}&", percent_encode(credentials.consumer_secret()))
}

/// Sign a base string with the given credentials.
///
/// Returns the base64-encoded HMAC-SHA1 digest, ready to be appended to the
/// outgoing parameter set as `oauth_signature`.
#[must_use]
pub fn sign(credentials: &ConsumerCredentials, base_string: &str) -> String {
    hmac_sha1_base64(&signing_key(credentials), base_string)
}

/// Compute `Base64(HMAC-SHA1(key, data))`.
fn hmac_sha1_base64(key: &str, data: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(data.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
