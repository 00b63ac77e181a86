//! Percent-encoding and canonical parameter string construction.
//!
//! OAuth 1.0a normalizes request parameters into a single canonical string
//! before signing:
//!
//! ```text
//! enc(k1)=enc(v1)&enc(k2)=enc(v2)&...
//! ```
//!
//! where pairs are sorted by encoded key (encoded value breaks ties) and
//! `enc` is the RFC 3986 encoding over the unreserved alphabet. Both sides of
//! the call must produce this string byte-for-byte or the signatures diverge.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// The set of characters that must be percent-encoded in OAuth parameters.
///
/// Only the RFC 3986 unreserved characters (A-Z, a-z, 0-9, `-`, `_`, `.`,
/// `~`) pass through unescaped. Note that `!`, `*`, `'`, `(` and `)` are
/// escaped: WHATWG-style form encoders leave them raw, which the provider
/// rejects as a signature mismatch.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a string per the OAuth 1.0a parameter encoding rules.
///
/// Every byte outside the unreserved set is escaped as `%XX` with uppercase
/// hex digits. Total over all inputs; never fails.
///
/// # Examples
///
/// ```
/// use nutrigate_oauth::canonical::percent_encode;
///
/// assert_eq!(percent_encode("abc-123_~."), "abc-123_~.");
/// assert_eq!(percent_encode("a b"), "a%20b");
/// assert_eq!(percent_encode("100%!"), "100%25%21");
/// ```
#[must_use]
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Build the canonical parameter string from raw key/value pairs.
///
/// Each key and value is percent-encoded, then the pairs are sorted by
/// encoded key with encoded value breaking ties, and joined as
/// `k=v` pairs separated by `&`. The output is byte-identical for the same
/// logical parameter set regardless of input order.
///
/// The `oauth_signature` parameter must never be part of the input: the
/// signature is computed over this string, not included in it.
///
/// # Examples
///
/// ```
/// use nutrigate_oauth::canonical::canonical_param_string;
///
/// assert_eq!(
///     canonical_param_string(&[("b", "2"), ("a", "1")]),
///     "a=1&b=2"
/// );
/// ```
#[must_use]
pub fn canonical_param_string(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();

    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
