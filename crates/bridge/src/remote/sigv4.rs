// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AWS Signature Version 4 request signing.

use chrono::{DateTime, Utc};
use reqwest::Url;
use ring::{digest, hmac};

use crate::remote::credentials::StaticCredentials;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Inputs shared by every request signed for one service call.
pub struct SigningParams<'a> {
    pub credentials: &'a StaticCredentials,
    pub region: &'a str,
    pub service: &'a str,
    pub time: DateTime<Utc>,
}

/// A request to sign. `headers` are signed in addition to `host`,
/// `x-amz-date` and, with session credentials, `x-amz-security-token`.
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub url: &'a Url,
    pub headers: &'a [(&'a str, &'a str)],
    pub body: &'a [u8],
}

/// Sign a request and return the headers to attach to it.
pub fn sign(params: &SigningParams<'_>, req: &SignableRequest<'_>) -> Vec<(String, String)> {
    let amz_date = params.time.format("%Y%m%dT%H%M%SZ").to_string();
    let date = params.time.format("%Y%m%d").to_string();

    let mut headers: Vec<(String, String)> = req
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), normalize_header_value(value)))
        .collect();
    headers.push(("host".to_owned(), host_header(req.url)));
    headers.push(("x-amz-date".to_owned(), amz_date.clone()));
    if let Some(ref token) = params.credentials.session_token {
        headers.push(("x-amz-security-token".to_owned(), token.clone()));
    }
    headers.sort();

    let canonical = canonical_request(req.method, req.url, &headers, &sha256_hex(req.body));
    let scope = format!("{date}/{}/{}/aws4_request", params.region, params.service);
    let to_sign = string_to_sign(&amz_date, &scope, &canonical);
    let key =
        signing_key(&params.credentials.secret_access_key, &date, params.region, params.service);
    let signature = hex::encode(hmac_sha256(&key, to_sign.as_bytes()));

    let signed_headers = signed_header_names(&headers);
    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        params.credentials.access_key_id
    );

    let mut out =
        vec![("x-amz-date".to_owned(), amz_date), ("authorization".to_owned(), authorization)];
    if let Some(ref token) = params.credentials.session_token {
        out.push(("x-amz-security-token".to_owned(), token.clone()));
    }
    out
}

/// Build the canonical request. `headers` must be lowercased and sorted.
pub fn canonical_request(
    method: &str,
    url: &Url,
    headers: &[(String, String)],
    payload_hash: &str,
) -> String {
    let mut canonical_headers = String::new();
    for (name, value) in headers {
        canonical_headers.push_str(name);
        canonical_headers.push(':');
        canonical_headers.push_str(value);
        canonical_headers.push('\n');
    }
    format!(
        "{method}\n{}\n{}\n{canonical_headers}\n{}\n{payload_hash}",
        canonical_uri(url),
        canonical_query(url),
        signed_header_names(headers),
    )
}

pub fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    format!("{ALGORITHM}\n{amz_date}\n{scope}\n{}", sha256_hex(canonical_request.as_bytes()))
}

/// Derive the per-day signing key.
pub fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_secret = format!("AWS4{secret}");
    let k_date = hmac_sha256(k_secret.as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(digest::digest(&digest::SHA256, data).as_ref())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

fn signed_header_names(headers: &[(String, String)]) -> String {
    headers.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>().join(";")
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    }
}

/// Trim and collapse runs of spaces.
fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Each path segment of the (already encoded) request path is encoded again.
fn canonical_uri(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn canonical_query(url: &Url) -> String {
    let Some(query) = url.query() else {
        return String::new();
    };
    let mut pairs: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (reencode(key), reencode(value))
        })
        .collect();
    pairs.sort();
    pairs.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&")
}

fn reencode(component: &str) -> String {
    let decoded = urlencoding::decode(component)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| component.to_owned());
    urlencoding::encode(&decoded).into_owned()
}

#[cfg(test)]
#[path = "sigv4_tests.rs"]
mod tests;
