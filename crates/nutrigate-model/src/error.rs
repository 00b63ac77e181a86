//! Proxy error type shared by every pipeline stage.
//!
//! Errors are serialized to callers as `{"error": "<message>"}` with the
//! HTTP status carried by the error code. Upstream *application* errors
//! (well-formed provider rejections) are not represented here — they are
//! relayed verbatim so signing defects stay diagnosable from the caller's
//! side.

use std::fmt;

/// Well-known proxy error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ProxyErrorCode {
    /// Malformed request body (bad JSON, missing `method`).
    #[default]
    InvalidRequest,
    /// The `method` value is not one this proxy supports.
    UnsupportedMethod,
    /// A required method-specific field is absent.
    MissingParameter,
    /// No route for the path/method combination.
    NotFound,
    /// The provider could not be reached (DNS, connect, timeout).
    UpstreamUnavailable,
    /// Unexpected internal failure.
    Internal,
}

impl ProxyErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "InvalidRequest",
            Self::UnsupportedMethod => "UnsupportedMethod",
            Self::MissingParameter => "MissingParameter",
            Self::NotFound => "NotFound",
            Self::UpstreamUnavailable => "UpstreamUnavailable",
            Self::Internal => "Internal",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InvalidRequest | Self::UnsupportedMethod | Self::MissingParameter => {
                http::StatusCode::BAD_REQUEST
            }
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable => http::StatusCode::BAD_GATEWAY,
            Self::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ProxyErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proxy error response.
#[derive(Debug)]
pub struct ProxyError {
    /// The error code.
    pub code: ProxyErrorCode,
    /// A human-readable error message, relayed to the caller.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxyError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ProxyError {
    /// Create a new `ProxyError` with a custom message.
    #[must_use]
    pub fn with_message(code: ProxyErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Malformed request body.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_message(ProxyErrorCode::InvalidRequest, message)
    }

    /// Unsupported `method` value.
    #[must_use]
    pub fn unsupported_method(method: &str) -> Self {
        Self::with_message(
            ProxyErrorCode::UnsupportedMethod,
            format!("unsupported method: {method}"),
        )
    }

    /// Missing method-specific field.
    #[must_use]
    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self::with_message(ProxyErrorCode::MissingParameter, message)
    }

    /// No route for the request.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ProxyErrorCode::NotFound, message)
    }

    /// Transport failure reaching the provider.
    #[must_use]
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::with_message(ProxyErrorCode::UpstreamUnavailable, message)
    }

    /// Unexpected internal failure.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(ProxyErrorCode::Internal, message)
    }
}
