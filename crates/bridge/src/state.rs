// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{BridgeConfig, DatasourceSettings};
use crate::context::RequestContext;
use crate::remote::credentials::StaticCredentials;
use crate::remote::sts::StsTokenIssuer;
use crate::remote::twinmaker::TwinMakerClient;
use crate::remote::{ResourceClient, SessionTokenIssuer};

/// Settings and remote clients bound once at startup.
///
/// Shared as `Arc<Datasource>` by every handler and never mutated.
pub struct Datasource {
    pub settings: DatasourceSettings,
    pub resources: Arc<dyn ResourceClient>,
    pub tokens: Arc<dyn SessionTokenIssuer>,
    pub request_timeout: Duration,
    pub shutdown: CancellationToken,
}

impl Datasource {
    pub fn new(
        settings: DatasourceSettings,
        resources: Arc<dyn ResourceClient>,
        tokens: Arc<dyn SessionTokenIssuer>,
        request_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self { settings, resources, tokens, request_timeout, shutdown }
    }

    /// Resolve credentials and build the remote clients for `config`.
    pub fn connect(config: &BridgeConfig, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let settings = config.datasource_settings()?;
        let credentials = StaticCredentials::resolve(&settings)?;
        let resources = Arc::new(TwinMakerClient::new(&settings, credentials.clone())?);
        let tokens = Arc::new(StsTokenIssuer::new(&settings, credentials)?);
        Ok(Self::new(settings, resources, tokens, config.request_timeout(), shutdown))
    }

    /// Workspace every token and query is scoped to.
    pub fn workspace_id(&self) -> &str {
        &self.settings.workspace_id
    }

    /// Fresh context for one inbound request.
    pub fn context(&self, caller: Option<String>) -> RequestContext {
        RequestContext::new(&self.shutdown, self.request_timeout, caller)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
