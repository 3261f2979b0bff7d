// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the bridge.

pub mod http;

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::Datasource;

/// Build the axum `Router` with all bridge routes.
pub fn build_router(ds: Arc<Datasource>) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %uuid::Uuid::new_v4(),
        )
    });

    Router::new()
        .route("/health", get(http::health))
        // Credential broker
        .route("/token", get(http::token))
        // Resource queries
        .route("/entity", get(http::get_entity))
        .route("/list/workspaces", get(http::list_workspaces))
        .route("/list/scenes", get(http::list_scenes))
        .route("/list/options", get(http::list_options))
        .route("/list/entity", get(http::list_entity))
        .layer(ServiceBuilder::new().layer(trace).layer(CorsLayer::permissive()))
        .with_state(ds)
}
