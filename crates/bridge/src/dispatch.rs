// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource dispatcher: validates a named operation and runs it against the
//! bound workspace.

use serde::Serialize;

use crate::context::RequestContext;
use crate::error::DispatchError;
use crate::state::Datasource;

/// Operations exposed to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    GetEntity,
    ListWorkspaces,
    ListScenes,
    ListOptions,
    ListEntityOptions,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        Self::GetEntity,
        Self::ListWorkspaces,
        Self::ListScenes,
        Self::ListOptions,
        Self::ListEntityOptions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GetEntity => "get_entity",
            Self::ListWorkspaces => "list_workspaces",
            Self::ListScenes => "list_scenes",
            Self::ListOptions => "list_options",
            Self::ListEntityOptions => "list_entity",
        }
    }

    /// Whether the operation needs an entity `id`.
    pub fn is_entity_scoped(&self) -> bool {
        matches!(self, Self::GetEntity | Self::ListEntityOptions)
    }
}

/// A validated query, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceQuery {
    GetEntity { id: String },
    ListWorkspaces,
    ListScenes,
    ListOptions,
    ListEntityOptions { id: String },
}

impl ResourceQuery {
    /// Build a query for `kind`, rejecting entity operations without an id.
    ///
    /// An empty id counts as missing. Ids are ignored by workspace-level
    /// operations.
    pub fn parse(kind: OperationKind, id: Option<&str>) -> Result<Self, DispatchError> {
        let entity_id = || match id {
            Some(id) if !id.is_empty() => Ok(id.to_owned()),
            _ => Err(DispatchError::MissingEntityId),
        };
        Ok(match kind {
            OperationKind::GetEntity => Self::GetEntity { id: entity_id()? },
            OperationKind::ListWorkspaces => Self::ListWorkspaces,
            OperationKind::ListScenes => Self::ListScenes,
            OperationKind::ListOptions => Self::ListOptions,
            OperationKind::ListEntityOptions => Self::ListEntityOptions { id: entity_id()? },
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::GetEntity { .. } => OperationKind::GetEntity,
            Self::ListWorkspaces => OperationKind::ListWorkspaces,
            Self::ListScenes => OperationKind::ListScenes,
            Self::ListOptions => OperationKind::ListOptions,
            Self::ListEntityOptions { .. } => OperationKind::ListEntityOptions,
        }
    }

    fn entity_id(&self) -> Option<&str> {
        match self {
            Self::GetEntity { id } | Self::ListEntityOptions { id } => Some(id),
            _ => None,
        }
    }
}

/// Run `query` against the datasource's resource client.
///
/// Exactly one remote call per query; the remote payload is returned as JSON
/// without reshaping.
pub async fn dispatch(
    ds: &Datasource,
    ctx: &RequestContext,
    query: ResourceQuery,
) -> Result<serde_json::Value, DispatchError> {
    let op = query.kind().name();
    tracing::debug!(
        op,
        entity_id = query.entity_id().unwrap_or("-"),
        workspace_id = ds.workspace_id(),
        caller = ctx.caller.as_deref().unwrap_or("-"),
        "dispatching resource query"
    );
    let client = &ds.resources;
    let res = match &query {
        ResourceQuery::GetEntity { id } => ctx.run(client.get_entity(id)).await,
        ResourceQuery::ListWorkspaces => ctx.run(client.list_workspaces()).await.and_then(to_json),
        ResourceQuery::ListScenes => ctx.run(client.list_scenes()).await.and_then(to_json),
        ResourceQuery::ListOptions => ctx.run(client.list_options()).await.and_then(to_json),
        ResourceQuery::ListEntityOptions { id } => {
            ctx.run(client.list_entity(id)).await.and_then(to_json)
        }
    };
    if let Err(ref e) = res {
        tracing::warn!(op, code = e.as_str(), err = %e, "resource query failed");
    }
    res
}

fn to_json<T: Serialize>(value: T) -> Result<serde_json::Value, DispatchError> {
    serde_json::to_value(value).map_err(|e| DispatchError::Encoding(e.to_string()))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
