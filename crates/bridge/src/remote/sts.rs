// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session token issuance through the security token service.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use reqwest::Method;
use serde::Deserialize;

use crate::config::DatasourceSettings;
use crate::remote::client::SignedClient;
use crate::remote::credentials::StaticCredentials;
use crate::remote::{SessionToken, SessionTokenIssuer};

const STS_VERSION: &str = "2011-06-15";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const ROLE_SESSION_NAME_MAX: usize = 64;

/// Issues session tokens with `GetSessionToken`, or with a workspace-scoped
/// `AssumeRole` when a role is configured.
pub struct StsTokenIssuer {
    client: SignedClient,
    region: String,
    assume_role_arn: Option<String>,
}

impl StsTokenIssuer {
    pub fn new(
        settings: &DatasourceSettings,
        credentials: StaticCredentials,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: SignedClient::new(
                settings.sts_endpoint(),
                settings.region.clone(),
                "sts",
                credentials,
            )?,
            region: settings.region.clone(),
            assume_role_arn: settings.assume_role_arn.clone().filter(|arn| !arn.is_empty()),
        })
    }

    /// Form parameters for the token request.
    pub fn request_params(
        &self,
        ttl: Duration,
        workspace_id: &str,
    ) -> Vec<(&'static str, String)> {
        let duration = ttl.as_secs().to_string();
        match &self.assume_role_arn {
            Some(role_arn) => vec![
                ("Action", "AssumeRole".to_owned()),
                ("DurationSeconds", duration),
                ("Policy", workspace_policy(&self.region, workspace_id).to_string()),
                ("RoleArn", role_arn.clone()),
                ("RoleSessionName", role_session_name(workspace_id)),
                ("Version", STS_VERSION.to_owned()),
            ],
            None => vec![
                ("Action", "GetSessionToken".to_owned()),
                ("DurationSeconds", duration),
                ("Version", STS_VERSION.to_owned()),
            ],
        }
    }

    async fn issue(&self, ttl: Duration, workspace_id: &str) -> anyhow::Result<SessionToken> {
        let params = self.request_params(ttl, workspace_id);
        let action = params.first().map(|(_, v)| v.clone()).unwrap_or_default();
        let body = encode_form(&params);

        let bytes =
            self.client.send(Method::POST, "/", FORM_CONTENT_TYPE, body.into_bytes()).await?;
        let json: serde_json::Value = serde_json::from_slice(&bytes)?;
        let credentials = json
            .get(format!("{action}Response"))
            .and_then(|r| r.get(format!("{action}Result")))
            .and_then(|r| r.get("Credentials"))
            .ok_or_else(|| anyhow::anyhow!("token service response missing credentials"))?;
        let credentials: StsCredentials = serde_json::from_value(credentials.clone())?;

        Ok(SessionToken {
            access_key_id: credentials.access_key_id,
            secret_access_key: credentials.secret_access_key,
            session_token: credentials.session_token,
            expiration: parse_expiration(&credentials.expiration)?,
            workspace_id: workspace_id.to_owned(),
        })
    }
}

impl SessionTokenIssuer for StsTokenIssuer {
    fn get_session_token<'a>(
        &'a self,
        ttl: Duration,
        workspace_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<SessionToken>> {
        Box::pin(self.issue(ttl, workspace_id))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StsCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: serde_json::Value,
}

/// Read-only access to the bound workspace and everything in it.
pub fn workspace_policy(region: &str, workspace_id: &str) -> serde_json::Value {
    let workspace_arn = format!("arn:aws:iottwinmaker:{region}:*:workspace/{workspace_id}");
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Action": ["iottwinmaker:Get*", "iottwinmaker:List*"],
                "Resource": [workspace_arn.clone(), format!("{workspace_arn}/*")],
            },
            {
                "Effect": "Allow",
                "Action": "iottwinmaker:ListWorkspaces",
                "Resource": "*",
            },
        ],
    })
}

/// Role session names allow `[\w+=,.@-]` and at most 64 characters.
pub fn role_session_name(workspace_id: &str) -> String {
    let raw = format!("twinbridge-{workspace_id}");
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || "_+=,.@-".contains(c) { c } else { '-' })
        .take(ROLE_SESSION_NAME_MAX)
        .collect()
}

fn encode_form(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Expiration arrives as epoch seconds (integer or float) or RFC 3339.
pub fn parse_expiration(value: &serde_json::Value) -> anyhow::Result<DateTime<Utc>> {
    if let Some(secs) = value.as_f64() {
        let whole = secs.trunc() as i64;
        let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
        return DateTime::from_timestamp(whole, nanos)
            .ok_or_else(|| anyhow::anyhow!("expiration out of range: {secs}"));
    }
    if let Some(text) = value.as_str() {
        return Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc));
    }
    anyhow::bail!("unrecognized expiration: {value}")
}

#[cfg(test)]
#[path = "sts_tests.rs"]
mod tests;
