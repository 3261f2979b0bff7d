// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote digital-twin service: query and token clients.

pub mod client;
pub mod credentials;
pub mod sigv4;
pub mod sts;
pub mod twinmaker;

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Read queries against the bound workspace.
///
/// Object-safe for use as `Arc<dyn ResourceClient>`.
pub trait ResourceClient: Send + Sync {
    fn get_entity<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<serde_json::Value>>;

    fn list_workspaces(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>>;

    fn list_scenes(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>>;

    fn list_options(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>>;

    /// Options derived from one entity (its components).
    fn list_entity<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<SelectableValue>>>;
}

/// Issues short-lived credentials from the authenticated session.
pub trait SessionTokenIssuer: Send + Sync {
    fn get_session_token<'a>(
        &'a self,
        ttl: Duration,
        workspace_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<SessionToken>>;
}

/// Temporary credential material as issued by the token service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionToken {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
    /// Workspace the token was requested for. Not part of the wire shape.
    #[serde(skip)]
    pub workspace_id: String,
}

/// A `{value, label}` pair for frontend pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableValue {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectableValue {
    pub fn new(value: impl Into<String>, description: Option<String>) -> Self {
        let value = value.into();
        Self { label: value.clone(), value, description }
    }
}

/// Install the `ring` provider for rustls. Safe to call more than once.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
