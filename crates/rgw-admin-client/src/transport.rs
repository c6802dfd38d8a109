//! Request execution and response classification.

use chrono::Utc;
use reqwest::{Method, StatusCode, Url};
use rgw_admin_core::QueryValues;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::RgwAdminClient;
use crate::error::{AdminError, Result};
use crate::signer::sign_request;

/// Error document returned by the gateway.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiErrorResponse {
    /// Error code such as `NoSuchUser`.
    #[serde(rename = "Code")]
    pub code: String,
    /// Request ID assigned by the gateway.
    #[serde(rename = "RequestId")]
    pub request_id: String,
}

impl RgwAdminClient {
    /// Build `<host>/<prefix><route>?<sub>&<query>`.
    pub(crate) fn admin_url(&self, route: &str, values: &QueryValues, sub: Option<&str>) -> String {
        let config = self.config();
        let mut url = config.host.clone();
        if !config.admin_prefix.is_empty() {
            url.push('/');
            url.push_str(&config.admin_prefix);
        }
        url.push_str(route);
        url.push('?');
        if let Some(sub) = sub {
            url.push_str(sub);
            url.push('&');
        }
        url.push_str(&values.encode());
        url
    }

    /// Sign and send one admin request, returning the body of a successful response.
    pub(crate) async fn call(
        &self,
        method: Method,
        route: &str,
        values: &QueryValues,
        sub: Option<&str>,
    ) -> Result<Vec<u8>> {
        let raw_url = self.admin_url(route, values, sub);
        let url = Url::parse(&raw_url)
            .map_err(|e| AdminError::RequestBuild(format!("invalid URL {raw_url}: {e}")))?;

        // The query may carry key material, so only the path is logged.
        tracing::debug!(%method, path = url.path(), "sending admin request");

        let mut request = self
            .http()
            .request(method, url)
            .build()
            .map_err(|e| AdminError::RequestBuild(e.to_string()))?;

        let config = self.config();
        sign_request(
            &mut request,
            config.credentials(),
            &config.signing_scope,
            Utc::now(),
        )?;

        let response = self.http().execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if let Err(e) = classify(status, &body) {
            tracing::warn!(%status, error = %e, route, "admin request failed");
            return Err(e);
        }

        Ok(body.to_vec())
    }
}

/// Decide whether a response is a failure.
///
/// A non-empty `Code` in the body is an error whatever the status; otherwise
/// any status other than 200 is.
pub(crate) fn classify(status: StatusCode, body: &[u8]) -> Result<()> {
    let api_error = serde_json::from_slice::<ApiErrorResponse>(body)
        .ok()
        .filter(|e| !e.code.is_empty());

    match api_error {
        Some(api_error) => {
            tracing::debug!(
                request_id = %api_error.request_id,
                code = %api_error.code,
                "gateway returned an error document"
            );
            Err(AdminError::Api {
                code: api_error.code,
                status,
            })
        }
        None if status != StatusCode::OK => Err(AdminError::Status { status }),
        None => Ok(()),
    }
}

/// Decode a response body into the operation's result type.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use rgw_admin_core::{Usage, User};

    fn client(prefix: &str) -> RgwAdminClient {
        let config = ClientConfig::new("http://rgw:7480/", "ak", "sk").with_admin_prefix(prefix);
        RgwAdminClient::with_config(config).unwrap()
    }

    #[test]
    fn url_includes_prefix_and_query() {
        let mut values = QueryValues::new();
        values.add("uid", "alice");
        values.add("format", "json");

        assert_eq!(
            client("admin").admin_url("/user", &values, None),
            "http://rgw:7480/admin/user?format=json&uid=alice"
        );
    }

    #[test]
    fn url_with_custom_prefix_and_sub_resource() {
        let mut values = QueryValues::new();
        values.add("format", "json");

        assert_eq!(
            client("rgw-admin").admin_url("/user", &values, Some("quota")),
            "http://rgw:7480/rgw-admin/user?quota&format=json"
        );
        assert_eq!(
            client("").admin_url("/usage", &values, None),
            "http://rgw:7480/usage?format=json"
        );
    }

    #[test]
    fn code_in_body_wins_over_status() {
        let err =
            classify(StatusCode::FORBIDDEN, br#"{"Code":"InvalidAccessKeyId"}"#).unwrap_err();
        assert_eq!(err.code(), Some("InvalidAccessKeyId"));
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.to_string(), "[403 Forbidden]: InvalidAccessKeyId");
    }

    #[test]
    fn code_in_body_fails_even_on_ok() {
        let err =
            classify(StatusCode::OK, br#"{"Code":"NoSuchUser","RequestId":"tx1"}"#).unwrap_err();
        assert_eq!(err.code(), Some("NoSuchUser"));
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[test]
    fn non_ok_without_code() {
        let err = classify(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, AdminError::Status { status } if status == StatusCode::BAD_GATEWAY));

        let err = classify(StatusCode::NOT_FOUND, br#"{"Code":""}"#).unwrap_err();
        assert!(matches!(err, AdminError::Status { .. }));
    }

    #[test]
    fn ok_bodies_pass() {
        assert!(classify(StatusCode::OK, b"{}").is_ok());
        assert!(classify(StatusCode::OK, b"[\"alice\"]").is_ok());
        assert!(classify(StatusCode::OK, b"").is_ok());
    }

    #[test]
    fn empty_object_decodes_to_defaults() {
        let usage: Usage = decode(b"{}").unwrap();
        assert_eq!(usage, Usage::default());
    }

    #[test]
    fn decode_failures() {
        assert!(matches!(decode::<User>(b"not json"), Err(AdminError::Decode(_))));
        assert!(matches!(
            decode::<User>(br#"{"user_id": 5}"#),
            Err(AdminError::Decode(_))
        ));
    }
}
