// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the bridge.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::broker;
use crate::dispatch::{dispatch, OperationKind, ResourceQuery};
use crate::error::DispatchError;
use crate::health;
use crate::state::Datasource;

/// Header carrying the frontend user's login.
pub const CALLER_HEADER: &str = "x-grafana-user";

/// Query pairs in request order. Decoding into pairs cannot fail, so
/// repeated or unknown keys never bypass the JSON error body.
pub type QueryPairs = Vec<(String, String)>;

/// First `id` value in the query string.
fn entity_id(pairs: &QueryPairs) -> Option<&str> {
    pairs.iter().find(|(key, _)| key == "id").map(|(_, value)| value.as_str())
}

/// Encode a handler result: 200 with the payload as-is, or 400 with
/// `{"message": ...}`.
pub fn respond<T: Serialize>(result: Result<T, DispatchError>) -> Response {
    let encoded = result.and_then(|payload| {
        serde_json::to_vec(&payload).map_err(|e| DispatchError::Encoding(e.to_string()))
    });
    match encoded {
        Ok(body) => ([(CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => e.to_http_response().into_response(),
    }
}

fn caller(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Validate, dispatch and encode one resource query.
async fn handle(
    ds: &Datasource,
    headers: &HeaderMap,
    kind: OperationKind,
    id: Option<&str>,
) -> Response {
    let query = match ResourceQuery::parse(kind, id) {
        Ok(query) => query,
        Err(e) => {
            tracing::debug!(op = kind.name(), "rejected query without entity id");
            return respond::<()>(Err(e));
        }
    };
    let ctx = ds.context(caller(headers));
    respond(dispatch(ds, &ctx, query).await)
}

// -- Handlers -----------------------------------------------------------------

/// `GET /health`: probe the remote service. Always 200; state is in the body.
pub async fn health(State(ds): State<Arc<Datasource>>, headers: HeaderMap) -> impl IntoResponse {
    let ctx = ds.context(caller(&headers));
    Json(health::check_health(&ds, &ctx).await)
}

/// `GET /token`: issue a session token for the bound workspace.
pub async fn token(State(ds): State<Arc<Datasource>>, headers: HeaderMap) -> Response {
    let ctx = ds.context(caller(&headers));
    respond(broker::get_session_token(&ds, &ctx).await)
}

/// `GET /entity?id=`
pub async fn get_entity(
    State(ds): State<Arc<Datasource>>,
    headers: HeaderMap,
    Query(pairs): Query<QueryPairs>,
) -> Response {
    handle(&ds, &headers, OperationKind::GetEntity, entity_id(&pairs)).await
}

/// `GET /list/workspaces`
pub async fn list_workspaces(State(ds): State<Arc<Datasource>>, headers: HeaderMap) -> Response {
    handle(&ds, &headers, OperationKind::ListWorkspaces, None).await
}

/// `GET /list/scenes`
pub async fn list_scenes(State(ds): State<Arc<Datasource>>, headers: HeaderMap) -> Response {
    handle(&ds, &headers, OperationKind::ListScenes, None).await
}

/// `GET /list/options`: component types in the bound workspace.
pub async fn list_options(State(ds): State<Arc<Datasource>>, headers: HeaderMap) -> Response {
    handle(&ds, &headers, OperationKind::ListOptions, None).await
}

/// `GET /list/entity?id=`: components of one entity.
pub async fn list_entity(
    State(ds): State<Arc<Datasource>>,
    headers: HeaderMap,
    Query(pairs): Query<QueryPairs>,
) -> Response {
    handle(&ds, &headers, OperationKind::ListEntityOptions, entity_id(&pairs)).await
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
