//! Proxy configuration.
//!
//! All configuration is driven by environment variables and loaded once at
//! startup. Missing or empty credentials are a fatal startup error — the
//! process must not accept traffic it can never sign correctly.

use std::env;
use std::time::Duration;

use nutrigate_oauth::{ConsumerCredentials, CredentialsError};

/// Configuration error. Fatal: surfaces before the listener binds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// The credential pair failed validation.
    #[error("invalid credentials: {0}")]
    Credentials(#[from] CredentialsError),

    /// An environment variable holds an unparseable value.
    #[error("invalid value for {var}: {value}")]
    InvalidValue {
        /// The offending variable name.
        var: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// The outbound HTTP client could not be initialized.
    #[error("failed to initialize HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Global configuration for the proxy process.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Bind address for the ingress listener.
    pub listen: String,
    /// The fixed upstream endpoint all signed calls go to.
    pub upstream_url: String,
    /// Bounded timeout for each upstream request.
    pub upstream_timeout: Duration,
    /// Log level filter (overridden by `RUST_LOG`).
    pub log_level: String,
    /// Consumer credentials, immutable for the process lifetime.
    pub credentials: ConsumerCredentials,
}

impl ProxyConfig {
    /// Default bind address.
    pub const DEFAULT_LISTEN: &str = "0.0.0.0:8787";

    /// The provider's single API endpoint.
    pub const DEFAULT_UPSTREAM_URL: &str = "https://platform.fatsecret.com/rest/server.api";

    /// Default upstream request timeout in seconds.
    pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `FATSECRET_CONSUMER_KEY` | *(required)* | OAuth consumer key |
    /// | `FATSECRET_CONSUMER_SECRET` | *(required)* | OAuth consumer secret |
    /// | `PROXY_LISTEN` | `0.0.0.0:8787` | Bind address |
    /// | `FATSECRET_API_URL` | platform endpoint | Upstream endpoint |
    /// | `UPSTREAM_TIMEOUT_SECS` | `30` | Upstream request timeout |
    /// | `LOG_LEVEL` | `info` | Log level filter |
    pub fn from_env() -> Result<Self, ConfigError> {
        let consumer_key = env::var("FATSECRET_CONSUMER_KEY")
            .map_err(|_| ConfigError::MissingVar("FATSECRET_CONSUMER_KEY"))?;
        let consumer_secret = env::var("FATSECRET_CONSUMER_SECRET")
            .map_err(|_| ConfigError::MissingVar("FATSECRET_CONSUMER_SECRET"))?;
        let credentials = ConsumerCredentials::new(consumer_key, consumer_secret)?;

        let timeout_raw = env_or("UPSTREAM_TIMEOUT_SECS", "");
        let upstream_timeout = if timeout_raw.is_empty() {
            Duration::from_secs(Self::DEFAULT_UPSTREAM_TIMEOUT_SECS)
        } else {
            parse_timeout_secs(&timeout_raw)?
        };

        Ok(Self {
            listen: env_or("PROXY_LISTEN", Self::DEFAULT_LISTEN),
            upstream_url: env_or("FATSECRET_API_URL", Self::DEFAULT_UPSTREAM_URL),
            upstream_timeout,
            log_level: env_or("LOG_LEVEL", "info"),
            credentials,
        })
    }
}

/// Read an environment variable, falling back to a default.
fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a timeout value in whole seconds. Zero is rejected: an unbounded
/// upstream wait is exactly what the timeout exists to prevent.
fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            var: "UPSTREAM_TIMEOUT_SECS",
            value: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_positive_timeout() {
        assert_eq!(parse_timeout_secs("45").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_timeout_secs(" 5 ").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_should_reject_zero_timeout() {
        assert!(parse_timeout_secs("0").is_err());
    }

    #[test]
    fn test_should_reject_non_numeric_timeout() {
        assert!(parse_timeout_secs("soon").is_err());
        assert!(parse_timeout_secs("-3").is_err());
    }

    #[test]
    fn test_should_point_default_endpoint_at_the_platform_api() {
        assert_eq!(
            ProxyConfig::DEFAULT_UPSTREAM_URL,
            "https://platform.fatsecret.com/rest/server.api"
        );
    }
}
