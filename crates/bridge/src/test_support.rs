// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes and helpers shared by unit and integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::config::{AuthType, DatasourceSettings};
use crate::remote::{ResourceClient, SelectableValue, SessionToken, SessionTokenIssuer};
use crate::state::Datasource;

/// How a fake remote call completes.
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed,
    Fail(String),
    /// Never completes; used to exercise cancellation and deadlines.
    Hang,
}

impl Outcome {
    async fn resolve<T>(&self, value: T) -> anyhow::Result<T> {
        match self {
            Self::Succeed => Ok(value),
            Self::Fail(message) => Err(anyhow::anyhow!("{message}")),
            Self::Hang => std::future::pending().await,
        }
    }
}

/// Spy resource client that records every call it receives.
pub struct FakeResources {
    outcome: Outcome,
    calls: Mutex<Vec<String>>,
}

impl FakeResources {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self { outcome, calls: Mutex::new(Vec::new()) })
    }

    /// Recorded calls as `op` or `op:id`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn entity(entity_id: &str) -> serde_json::Value {
        serde_json::json!({
            "entityId": entity_id,
            "entityName": "Pump",
            "components": { "Telemetry": { "componentTypeId": "com.example.telemetry" } }
        })
    }

    pub fn options(prefix: &str) -> Vec<SelectableValue> {
        vec![
            SelectableValue::new(format!("{prefix}-a"), Some("first".into())),
            SelectableValue::new(format!("{prefix}-b"), None),
        ]
    }
}

impl ResourceClient for FakeResources {
    fn get_entity<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<serde_json::Value>> {
        self.record(format!("get_entity:{entity_id}"));
        Box::pin(self.outcome.resolve(Self::entity(entity_id)))
    }

    fn list_workspaces(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>> {
        self.record("list_workspaces".to_owned());
        Box::pin(self.outcome.resolve(Self::options("workspace")))
    }

    fn list_scenes(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>> {
        self.record("list_scenes".to_owned());
        Box::pin(self.outcome.resolve(Self::options("scene")))
    }

    fn list_options(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>> {
        self.record("list_options".to_owned());
        Box::pin(self.outcome.resolve(Self::options("component-type")))
    }

    fn list_entity<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<SelectableValue>>> {
        self.record(format!("list_entity:{entity_id}"));
        Box::pin(self.outcome.resolve(Self::options("component")))
    }
}

/// Token issuer that mints random credentials expiring after the requested TTL.
pub struct FakeIssuer {
    outcome: Outcome,
    requests: Mutex<Vec<(Duration, String)>>,
}

impl FakeIssuer {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self { outcome, requests: Mutex::new(Vec::new()) })
    }

    /// Recorded `(ttl, workspace_id)` pairs.
    pub fn requests(&self) -> Vec<(Duration, String)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl SessionTokenIssuer for FakeIssuer {
    fn get_session_token<'a>(
        &'a self,
        ttl: Duration,
        workspace_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<SessionToken>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((ttl, workspace_id.to_owned()));
        }
        let expiration = chrono::Utc::now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());
        let token = SessionToken {
            access_key_id: format!("ASIA{}", uuid::Uuid::new_v4().simple()),
            secret_access_key: uuid::Uuid::new_v4().to_string(),
            session_token: uuid::Uuid::new_v4().to_string(),
            expiration,
            workspace_id: workspace_id.to_owned(),
        };
        Box::pin(self.outcome.resolve(token))
    }
}

/// Key-auth settings bound to workspace `factory`.
pub fn test_settings() -> DatasourceSettings {
    DatasourceSettings {
        auth_type: AuthType::Keys,
        access_key: Some("AKIDEXAMPLE".into()),
        secret_key: Some("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into()),
        region: "us-east-1".into(),
        workspace_id: "factory".into(),
        assume_role_arn: None,
        endpoint: None,
        sts_endpoint: None,
    }
}

/// Datasource over the given fakes with a generous request deadline.
pub fn test_datasource(
    resources: Arc<dyn ResourceClient>,
    tokens: Arc<dyn SessionTokenIssuer>,
) -> Arc<Datasource> {
    Arc::new(Datasource::new(
        test_settings(),
        resources,
        tokens,
        Duration::from_secs(10),
        CancellationToken::new(),
    ))
}

/// Assert that an expression evaluates to `Err` whose Display output
/// contains the given substring.
#[macro_export]
macro_rules! assert_err_contains {
    ($expr:expr, $substr:expr) => {{
        let result = $expr;
        let Err(err) = result else {
            panic!(concat!("expected Err for: ", stringify!($expr)));
        };
        let msg = err.to_string();
        assert!(msg.contains($substr), "expected error containing {:?}, got: {msg:?}", $substr);
    }};
}
