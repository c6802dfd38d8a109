//! AWS Signature V4 request signing.
//!
//! The gateway authenticates admin requests the same way it authenticates
//! S3 requests. It does not check the region, so a fixed scope is enough
//! for most deployments; [`SigningScope`] exists for gateways behind proxies
//! that do.

use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderValue, AUTHORIZATION, HOST};
use reqwest::{Request, Url};
use rgw_admin_core::percent_encode;
use sha2::{Digest, Sha256};

use crate::error::{AdminError, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";
const X_AMZ_DATE: &str = "x-amz-date";
const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

/// Access key pair used to sign requests.
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    /// Access key ID.
    pub access_key: &'a str,
    /// Secret access key.
    pub secret_key: &'a str,
}

impl fmt::Debug for Credentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Region and service names embedded in the credential scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningScope {
    /// Region name (default: `us-east-1`).
    pub region: String,
    /// Service name (default: `s3`).
    pub service: String,
}

impl SigningScope {
    /// Create a scope.
    #[must_use]
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }
}

impl Default for SigningScope {
    fn default() -> Self {
        Self::new("us-east-1", "s3")
    }
}

/// Hex-encoded SHA-256 digest of a request payload.
#[must_use]
pub fn payload_sha256(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Sign `request` in place.
///
/// Sets `host`, `x-amz-date`, `x-amz-content-sha256` and `authorization`.
/// The body is only read; buffered bodies stay intact for sending.
///
/// # Errors
///
/// Returns [`AdminError::RequestBuild`] if the body is a stream, the URL has
/// no host, or a computed header value is not valid.
pub fn sign_request(
    request: &mut Request,
    credentials: Credentials<'_>,
    scope: &SigningScope,
    now: DateTime<Utc>,
) -> Result<()> {
    let payload_hash = match request.body() {
        None => payload_sha256(&[]),
        Some(body) => payload_sha256(body.as_bytes().ok_or_else(|| {
            AdminError::RequestBuild("streaming bodies cannot be signed".to_string())
        })?),
    };

    let host = host_header(request.url())?;
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let credential_scope = format!("{date}/{}/{}/aws4_request", scope.region, scope.service);

    let canonical_request = format!(
        "{}\n{}\n{}\nhost:{host}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n\n{SIGNED_HEADERS}\n{payload_hash}",
        request.method().as_str(),
        request.url().path(),
        canonical_query(request.url().query()),
    );

    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let signing_key = signing_key(credentials.secret_key, &date, &scope.region, &scope.service);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credentials.access_key
    );

    tracing::trace!(%credential_scope, "signed admin request");

    let headers = request.headers_mut();
    headers.insert(HOST, header_value(&host)?);
    headers.insert(X_AMZ_DATE, header_value(&amz_date)?);
    headers.insert(X_AMZ_CONTENT_SHA256, header_value(&payload_hash)?);
    headers.insert(AUTHORIZATION, header_value(&authorization)?);

    Ok(())
}

fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| AdminError::RequestBuild(format!("URL has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AdminError::RequestBuild(e.to_string()))
}

/// Canonical query string built from the raw query as sent.
///
/// Only `%XX` escapes are decoded; a literal `+` stays a plus sign, as the
/// gateway reads it. Pairs are re-encoded per RFC 3986 and sorted.
fn canonical_query(query: Option<&str>) -> String {
    let mut pairs: Vec<(String, String)> = query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                percent_encode(&percent_decode(key)),
                percent_encode(&percent_decode(value)),
            )
        })
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode `%XX` escapes, leaving malformed escapes as-is.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(byte) = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                decoded.push(byte);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_secret = format!("AWS4{secret_key}");
    let k_date = hmac_sha256(k_secret.as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    // INVARIANT: HMAC accepts keys of any length (RFC 2104).
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts any key size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
