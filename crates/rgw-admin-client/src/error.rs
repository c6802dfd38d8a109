//! Client error types.

use reqwest::StatusCode;
use rgw_admin_core::QueryError;

/// Result type for admin client operations.
pub type Result<T> = std::result::Result<T, AdminError>;

/// Errors that can occur when using the admin client.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be built or signed.
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned an error code in the response body.
    #[error("[{status}]: {code}")]
    Api {
        /// Error code from the body, e.g. `InvalidAccessKeyId`.
        code: String,
        /// HTTP status code.
        status: StatusCode,
    },

    /// The gateway returned a non-200 status without an error code.
    #[error("[{status}]: unexpected response status")]
    Status {
        /// HTTP status code.
        status: StatusCode,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Query parameters could not be serialized.
    #[error("serialization error: {0}")]
    Query(#[from] QueryError),
}

impl AdminError {
    /// Error code reported by the gateway, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// HTTP status of the failed exchange, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } | Self::Status { status } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}
