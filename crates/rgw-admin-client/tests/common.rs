//! Common test utilities for admin API integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::{Match, Request};

type HmacSha256 = Hmac<Sha256>;

/// Matcher that accepts only requests whose Signature V4 verifies.
///
/// The signature is recomputed from the request exactly as received: the raw
/// query is split on `&`, only `%XX` escapes are decoded (a `+` stays a plus
/// sign), and pairs are re-encoded per RFC 3986 and sorted.
pub struct ValidSignature {
    /// Expected access key ID.
    pub access_key: &'static str,
    /// Secret key to verify with.
    pub secret_key: &'static str,
}

impl Match for ValidSignature {
    fn matches(&self, request: &Request) -> bool {
        verify_signature(request, self.access_key, self.secret_key).unwrap_or(false)
    }
}

/// Recompute the signature of a received request and compare.
///
/// Returns `None` when the request lacks the parts needed to verify.
pub fn verify_signature(request: &Request, access_key: &str, secret_key: &str) -> Option<bool> {
    let header = |name: &str| request.headers.get(name)?.to_str().ok();

    let auth = header("authorization")?.strip_prefix("AWS4-HMAC-SHA256 ")?;
    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;
    for part in auth.split(", ") {
        let (name, value) = part.split_once('=')?;
        match name {
            "Credential" => credential = Some(value),
            "SignedHeaders" => signed_headers = Some(value),
            "Signature" => signature = Some(value),
            _ => return None,
        }
    }

    let scope: Vec<&str> = credential?.split('/').collect();
    let [key_id, date, region, service, "aws4_request"] = scope.as_slice() else {
        return None;
    };
    if *key_id != access_key {
        return Some(false);
    }

    let payload_hash = header("x-amz-content-sha256")?;
    if payload_hash != hex::encode(Sha256::digest(&request.body)) {
        return Some(false);
    }

    let signed_headers = signed_headers?;
    let mut canonical_headers = BTreeMap::new();
    for name in signed_headers.split(';') {
        canonical_headers.insert(name, header(name)?.trim());
    }
    let canonical_headers: String = canonical_headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();

    let canonical_request = format!(
        "{}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{payload_hash}",
        request.method.as_str(),
        request.url.path(),
        canonical_query(request.url.query().unwrap_or("")),
    );

    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{date}/{region}/{service}/aws4_request\n{}",
        header("x-amz-date")?,
        hex::encode(Sha256::digest(canonical_request.as_bytes()))
    );

    let k_date = hmac(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    let k_signing = hmac(&k_service, b"aws4_request");

    Some(hex::encode(hmac(&k_signing, string_to_sign.as_bytes())) == signature?)
}

fn canonical_query(query: &str) -> String {
    let mut params: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = url_decode(parts.next().unwrap_or(""));
            let value = url_decode(parts.next().unwrap_or(""));
            (key, value)
        })
        .collect();
    params.sort();

    params
        .iter()
        .map(|(k, v)| format!("{}={}", rfc3986(k), rfc3986(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(byte) = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn rfc3986(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                char::from(b).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Log output captured from a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer lock")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer lock")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture every event on the current thread until the guard is dropped.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
