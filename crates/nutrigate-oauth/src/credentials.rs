//! Consumer credential pair for two-legged OAuth.

use std::fmt;

/// Error produced when constructing [`ConsumerCredentials`] from invalid
/// input.
///
/// An empty key or secret would produce signatures the provider can never
/// verify, so this is a startup-time misconfiguration rather than a
/// per-request failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialsError {
    /// The consumer key is empty.
    #[error("consumer key must not be empty")]
    EmptyConsumerKey,

    /// The consumer secret is empty.
    #[error("consumer secret must not be empty")]
    EmptyConsumerSecret,
}

/// The long-lived consumer key/secret pair identifying the calling
/// application to the provider.
///
/// Loaded once at startup and immutable for the process lifetime. The secret
/// is redacted from `Debug` output so it never reaches the logs.
#[derive(Clone)]
pub struct ConsumerCredentials {
    consumer_key: String,
    consumer_secret: String,
}

impl ConsumerCredentials {
    /// Create a credential pair, rejecting empty components.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let consumer_key = consumer_key.into();
        let consumer_secret = consumer_secret.into();

        if consumer_key.is_empty() {
            return Err(CredentialsError::EmptyConsumerKey);
        }
        if consumer_secret.is_empty() {
            return Err(CredentialsError::EmptyConsumerSecret);
        }

        Ok(Self {
            consumer_key,
            consumer_secret,
        })
    }

    /// The public consumer key, sent as `oauth_consumer_key`.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// The consumer secret. Only the signer should need this.
    #[must_use]
    pub(crate) fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }
}

impl fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[redacted]")
            .finish()
    }
}
