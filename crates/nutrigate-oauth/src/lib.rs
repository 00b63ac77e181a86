//! OAuth 1.0a two-legged request signing for NutriGate.
//!
//! This crate implements the consumer-only (no user token) HMAC-SHA1 signing
//! scheme used by the FatSecret platform API. Given a set of request
//! parameters, it produces the `oauth_signature` value the provider expects:
//!
//! ```text
//! base_string = METHOD & enc(endpoint) & enc(sorted_encoded_params)
//! signature   = Base64(HMAC-SHA1(enc(consumer_secret) + "&", base_string))
//! ```
//!
//! The provider recomputes the signature from the received parameters and
//! rejects any request whose signature does not match byte-for-byte, so every
//! step here — the percent-encoding alphabet, the parameter ordering, the
//! separator placement — is part of the wire contract.
//!
//! # Usage
//!
//! ```
//! use nutrigate_oauth::{
//!     ConsumerCredentials, ProtocolParams, canonical_param_string, sign,
//!     signature_base_string,
//! };
//!
//! let credentials = ConsumerCredentials::new("key", "secret").unwrap();
//! let protocol = ProtocolParams::fresh(credentials.consumer_key());
//!
//! let mut params = protocol.pairs();
//! params.push(("method", "foods.search".to_owned()));
//! let refs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
//!
//! let canonical = canonical_param_string(&refs);
//! let base = signature_base_string("POST", "https://example.com/api", &canonical);
//! let signature = sign(&credentials, &base);
//! assert!(!signature.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - RFC 3986 percent-encoding and canonical parameter strings
//! - [`credentials`] - Consumer key/secret pair with startup validation
//! - [`protocol`] - Per-request protocol parameters (nonce, timestamp)
//! - [`signer`] - Signature base string, signing key, and HMAC-SHA1 signature

pub mod canonical;
pub mod credentials;
pub mod protocol;
pub mod signer;

pub use canonical::{canonical_param_string, percent_encode};
pub use credentials::{ConsumerCredentials, CredentialsError};
pub use protocol::ProtocolParams;
pub use signer::{sign, signature_base_string, signing_key};
