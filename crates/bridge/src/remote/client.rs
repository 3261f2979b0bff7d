// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signed HTTP client for one remote service.

use reqwest::{Client, Method, StatusCode, Url};

use crate::error::RemoteError;
use crate::remote::credentials::StaticCredentials;
use crate::remote::sigv4::{self, SignableRequest, SigningParams};

/// HTTP client wrapper that signs every request for a single service.
pub struct SignedClient {
    base_url: String,
    region: String,
    service: &'static str,
    credentials: StaticCredentials,
    client: Client,
}

impl SignedClient {
    pub fn new(
        base_url: String,
        region: String,
        service: &'static str,
        credentials: StaticCredentials,
    ) -> anyhow::Result<Self> {
        crate::remote::install_crypto_provider();
        // No client-level timeout: the request context owns the deadline.
        let client = Client::builder().build()?;
        Ok(Self { base_url, region, service, credentials, client })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Send a signed request and return the body of a successful response.
    ///
    /// Non-2xx responses become a [`RemoteError`] carrying the remote message.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> anyhow::Result<Vec<u8>> {
        let url = self.url(path)?;
        let headers = [("content-type", content_type)];
        let params = SigningParams {
            credentials: &self.credentials,
            region: &self.region,
            service: self.service,
            time: chrono::Utc::now(),
        };
        let signed = sigv4::sign(
            &params,
            &SignableRequest { method: method.as_str(), url: &url, headers: &headers, body: &body },
        );

        let mut req = self
            .client
            .request(method, url)
            .header("content-type", content_type)
            .header("accept", "application/json");
        for (name, value) in signed {
            req = req.header(name, value);
        }
        let resp = req.body(body).send().await.map_err(transport_error)?;

        let status = resp.status();
        let error_type = resp
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = resp.bytes().await.map_err(transport_error)?.to_vec();
        if status.is_success() {
            return Ok(bytes);
        }
        Err(parse_remote_error(status, error_type.as_deref(), &bytes).into())
    }

    /// Send a JSON body and decode a JSON response.
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: &serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let payload = if method == Method::GET { Vec::new() } else { serde_json::to_vec(body)? };
        let bytes = self.send(method, path, "application/json", payload).await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Flatten a transport failure with its full source chain so the cause
/// (refused connection, DNS, reset) reaches the caller's message.
fn transport_error(e: reqwest::Error) -> anyhow::Error {
    anyhow::anyhow!("{:#}", anyhow::Error::new(e))
}

/// Extract the remote error code and message from a failed response.
///
/// Handles REST-JSON (`message` + `x-amzn-ErrorType`), query-JSON
/// (`{"Error": {...}}`) and XML error documents.
pub fn parse_remote_error(
    status: StatusCode,
    error_type: Option<&str>,
    body: &[u8],
) -> RemoteError {
    let header_code = error_type.map(|t| t.split(':').next().unwrap_or(t).to_owned());

    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        let error = json.get("Error").unwrap_or(&json);
        let message = ["message", "Message"]
            .iter()
            .find_map(|key| error.get(*key).and_then(|v| v.as_str()));
        if let Some(message) = message {
            let code = ["Code", "code", "__type"]
                .iter()
                .find_map(|key| error.get(*key).and_then(|v| v.as_str()))
                .map(|c| c.rsplit('#').next().unwrap_or(c).to_owned())
                .or(header_code);
            return RemoteError { code, message: message.to_owned(), status: status.as_u16() };
        }
    }

    let text = String::from_utf8_lossy(body);
    if let Some(message) = xml_element(&text, "Message") {
        let code = xml_element(&text, "Code").or(header_code);
        return RemoteError { code, message, status: status.as_u16() };
    }

    let message = match text.trim() {
        "" => format!("HTTP {status}"),
        body => format!("HTTP {status}: {body}"),
    };
    RemoteError { code: header_code, message, status: status.as_u16() }
}

fn xml_element(text: &str, name: &str) -> Option<String> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(text[start..end].trim().to_owned())
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
