// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential broker: short-lived session tokens for the bound workspace.

use std::time::Duration;

use crate::context::RequestContext;
use crate::error::DispatchError;
use crate::remote::SessionToken;
use crate::state::Datasource;

/// Lifetime requested for every issued token.
pub const SESSION_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Issue a fresh session token scoped to the datasource's workspace.
///
/// Single attempt, nothing cached: every call reaches the token service.
pub async fn get_session_token(
    ds: &Datasource,
    ctx: &RequestContext,
) -> Result<SessionToken, DispatchError> {
    let workspace_id = ds.workspace_id();
    tracing::debug!(
        workspace_id,
        ttl_secs = SESSION_TOKEN_TTL.as_secs(),
        caller = ctx.caller.as_deref().unwrap_or("-"),
        "issuing session token"
    );
    let res = ctx.run(ds.tokens.get_session_token(SESSION_TOKEN_TTL, workspace_id)).await;
    if let Err(ref e) = res {
        tracing::warn!(workspace_id, err = %e, "session token request failed");
    }
    res
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
