//! RADOS Gateway admin API client implementation.

use std::time::Duration;

use reqwest::{Client, Method};
use rgw_admin_core::{
    serialize, CreateUserConfig, Quota, QuotaType, QueryValues, RemoveUserConfig, ToQuery, Usage,
    UsageConfig, User,
};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::transport::decode;

const USAGE_ROUTE: &str = "/usage";
const USER_ROUTE: &str = "/user";
const USER_METADATA_ROUTE: &str = "/metadata/user";

/// RADOS Gateway admin API client.
///
/// Each method performs one signed request. The caller's key pair must carry
/// the capability listed on the method; the gateway enforces it and the
/// client surfaces its error code.
#[derive(Debug, Clone)]
pub struct RgwAdminClient {
    http: Client,
    config: ClientConfig,
}

impl RgwAdminClient {
    /// Create a client with default settings.
    ///
    /// # Arguments
    ///
    /// * `host` - Gateway base URL (e.g., `"http://rgw:7480"`)
    /// * `access_key` - Access key ID of an admin-capable user
    /// * `secret_key` - Matching secret key
    ///
    /// # Errors
    ///
    /// Returns an error if any argument is empty or the HTTP client cannot be built.
    pub fn new(
        host: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(ClientConfig::new(host, access_key, secret_key))
    }

    /// Create a client from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    /// Create a client that sends requests through an existing HTTP client.
    ///
    /// Timeouts and TLS settings come from `http`; `config.timeout_seconds` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete.
    pub fn with_http_client(http: Client, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { http, config })
    }

    /// The client's configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Read bandwidth and operation usage.
    ///
    /// Caps: `usage=read`.
    ///
    /// Without a config the gateway's defaults apply. With one, entries and
    /// summary are explicitly disabled unless requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway reports an error.
    pub async fn get_usage(&self, config: Option<&UsageConfig>) -> Result<Usage> {
        let mut values = admin_query(config)?;
        if let Some(config) = config {
            if !config.show_entries {
                values.set("show-entries", "False");
            }
            if !config.show_summary {
                values.set("show-summary", "False");
            }
        }

        let body = self.call(Method::GET, USAGE_ROUTE, &values, None).await?;
        decode(&body)
    }

    /// Remove usage records.
    ///
    /// Caps: `usage=write`.
    ///
    /// With no user and no window every record is removed; the gateway then
    /// expects `remove_all` to be set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway reports an error.
    pub async fn delete_usage(&self, config: Option<&UsageConfig>) -> Result<()> {
        let removal = config.map(UsageConfig::removal);
        let values = admin_query(removal.as_ref())?;
        self.call(Method::DELETE, USAGE_ROUTE, &values, None).await?;
        Ok(())
    }

    /// Get a user's information.
    ///
    /// Caps: `users=read`.
    ///
    /// `Some(uid)` is always sent as `uid=<uid>`, even when empty; the
    /// gateway then rejects the lookup. Without `uid` the gateway answers with
    /// its user listing instead; use [`Self::list_users`] to read that as a
    /// list of IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the user does not exist, or the
    /// body is not a user document.
    pub async fn get_user(&self, uid: Option<&str>) -> Result<User> {
        let mut values = json_query();
        if let Some(uid) = uid {
            values.add("uid", uid);
        }

        let body = self.call(Method::GET, USER_ROUTE, &values, None).await?;
        decode(&body)
    }

    /// List all user IDs.
    ///
    /// Caps: `metadata=read`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway reports an error.
    pub async fn list_users(&self) -> Result<Vec<String>> {
        let values = json_query();
        let body = self
            .call(Method::GET, USER_METADATA_ROUTE, &values, None)
            .await?;
        decode(&body)
    }

    /// Create a user.
    ///
    /// Caps: `users=write`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway reports an error
    /// (e.g. `UserAlreadyExists`).
    pub async fn create_user(&self, config: &CreateUserConfig) -> Result<User> {
        let values = admin_query(Some(config))?;
        let body = self.call(Method::PUT, USER_ROUTE, &values, None).await?;
        decode(&body)
    }

    /// Remove a user, optionally purging its data.
    ///
    /// Caps: `users=write`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway reports an error.
    pub async fn remove_user(&self, config: &RemoveUserConfig) -> Result<()> {
        let values = admin_query(Some(config))?;
        self.call(Method::DELETE, USER_ROUTE, &values, None).await?;
        Ok(())
    }

    /// Read a user's user-level or bucket-level quota.
    ///
    /// Caps: `users=read`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway reports an error.
    pub async fn get_quota(&self, uid: &str, quota_type: QuotaType) -> Result<Quota> {
        let mut values = json_query();
        values.add("uid", uid);
        values.add("quota-type", quota_type.as_str());

        let body = self
            .call(Method::GET, USER_ROUTE, &values, Some("quota"))
            .await?;
        decode(&body)
    }
}

/// Query values requesting JSON output.
fn json_query() -> QueryValues {
    let mut values = QueryValues::new();
    values.add("format", "json");
    values
}

/// Serialize an optional record and request JSON output.
fn admin_query<T: ToQuery + ?Sized>(record: Option<&T>) -> Result<QueryValues> {
    let mut values = match record {
        Some(record) => serialize(record)?,
        None => QueryValues::new(),
    };
    values.add("format", "json");
    Ok(values)
}
