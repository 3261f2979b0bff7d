// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-lived signing credentials resolved once at startup.

use std::fmt;

use crate::config::{AuthType, DatasourceSettings};

/// Access key material used to sign outbound requests.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Resolve credentials for the configured auth type.
    pub fn resolve(settings: &DatasourceSettings) -> anyhow::Result<Self> {
        Self::resolve_with(settings, |key| std::env::var(key).ok())
    }

    /// Like [`resolve`](Self::resolve) with an explicit environment lookup.
    pub fn resolve_with(
        settings: &DatasourceSettings,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        match settings.auth_type {
            AuthType::Keys => {
                let access = non_empty(settings.access_key.clone())
                    .ok_or_else(|| anyhow::anyhow!("access key is not configured"))?;
                let secret = non_empty(settings.secret_key.clone())
                    .ok_or_else(|| anyhow::anyhow!("secret key is not configured"))?;
                Ok(Self::new(access, secret))
            }
            AuthType::Default => {
                let access = non_empty(env("AWS_ACCESS_KEY_ID"))
                    .ok_or_else(|| anyhow::anyhow!("AWS_ACCESS_KEY_ID is not set"))?;
                let secret = non_empty(env("AWS_SECRET_ACCESS_KEY"))
                    .ok_or_else(|| anyhow::anyhow!("AWS_SECRET_ACCESS_KEY is not set"))?;
                Ok(Self {
                    access_key_id: access,
                    secret_access_key: secret,
                    session_token: non_empty(env("AWS_SESSION_TOKEN")),
                })
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
