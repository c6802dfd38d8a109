//! Client configuration.

use std::fmt;

use crate::error::{AdminError, Result};
use crate::signer::{Credentials, SigningScope};

/// Default administrative path prefix.
pub const DEFAULT_ADMIN_PREFIX: &str = "admin";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Connection and credential settings for the admin client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Gateway base URL including scheme (e.g., `"http://rgw:7480"`).
    pub host: String,
    /// Access key ID.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
    /// Path segment for administrative routes (default: `"admin"`).
    pub admin_prefix: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Region/service pair used for signing (default: `us-east-1` / `s3`).
    pub signing_scope: SigningScope,
}

impl ClientConfig {
    /// Create a config with default prefix, timeout and signing scope.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            admin_prefix: DEFAULT_ADMIN_PREFIX.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            signing_scope: SigningScope::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `RGW_HOST`, `RGW_ACCESS_KEY`, `RGW_SECRET_KEY` and the optional
    /// `RGW_ADMIN_PREFIX` and `RGW_TIMEOUT_SECONDS`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] if a required variable is missing
    /// or the timeout is not a number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    ///
    /// `lookup` maps a variable name to its value; see [`Self::from_env`]
    /// for the names read.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] if a required variable is missing
    /// or the timeout is not a number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| AdminError::Configuration(format!("{name} is not set")))
        };

        let mut config = Self::new(
            required("RGW_HOST")?,
            required("RGW_ACCESS_KEY")?,
            required("RGW_SECRET_KEY")?,
        );

        if let Some(prefix) = lookup("RGW_ADMIN_PREFIX") {
            config = config.with_admin_prefix(prefix);
        }

        if let Some(timeout) = lookup("RGW_TIMEOUT_SECONDS") {
            let seconds = timeout.parse().map_err(|_| {
                AdminError::Configuration(format!("RGW_TIMEOUT_SECONDS is not a number: {timeout}"))
            })?;
            config = config.with_timeout_seconds(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the administrative path prefix.
    #[must_use]
    pub fn with_admin_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.admin_prefix = prefix.into().trim_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Override the signing region and service.
    #[must_use]
    pub fn with_signing_scope(mut self, scope: SigningScope) -> Self {
        self.signing_scope = scope;
        self
    }

    /// Borrow the access key pair for signing.
    #[must_use]
    pub fn credentials(&self) -> Credentials<'_> {
        Credentials {
            access_key: &self.access_key,
            secret_key: &self.secret_key,
        }
    }

    /// Check that host and credentials are present.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Configuration`] if the host or either key is empty.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() || self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(AdminError::Configuration(
                "host, access key and secret key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("admin_prefix", &self.admin_prefix)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("signing_scope", &self.signing_scope)
            .finish()
    }
}
