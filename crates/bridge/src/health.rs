// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

use crate::broker;
use crate::context::RequestContext;
use crate::state::Datasource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: String,
}

/// Probe the remote service by issuing a session token.
///
/// Failures carry the underlying error text unmodified so credential and
/// connectivity problems stay distinguishable.
pub async fn check_health(ds: &Datasource, ctx: &RequestContext) -> HealthCheckResult {
    match broker::get_session_token(ds, ctx).await {
        Ok(_) => HealthCheckResult { status: HealthStatus::Ok, message: "OK".to_owned() },
        Err(e) => {
            tracing::warn!(workspace_id = ds.workspace_id(), err = %e, "health check failed");
            HealthCheckResult { status: HealthStatus::Error, message: e.to_string() }
        }
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
