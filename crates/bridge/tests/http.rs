// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the bridge HTTP API.
//!
//! Uses `axum_test::TestServer` over fake remote clients.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use yare::parameterized;

use twinbridge::remote::SelectableValue;
use twinbridge::state::Datasource;
use twinbridge::test_support::{test_datasource, FakeIssuer, FakeResources, Outcome};
use twinbridge::transport::build_router;

const INVALID_TOKEN: &str = "The security token included in the request is invalid.";

fn test_server(ds: Arc<Datasource>) -> TestServer {
    TestServer::new(build_router(ds)).expect("failed to create test server")
}

fn resource_server(outcome: Outcome) -> (Arc<FakeResources>, TestServer) {
    let resources = FakeResources::new(outcome);
    let ds = test_datasource(resources.clone(), FakeIssuer::new(Outcome::Succeed));
    (resources, test_server(ds))
}

fn content_type(resp: &TestResponse) -> Option<String> {
    resp.headers().get("content-type").and_then(|v| v.to_str().ok()).map(str::to_owned)
}

#[parameterized(
    entity_missing = { "/entity" },
    entity_empty = { "/entity?id=" },
    components_missing = { "/list/entity" },
    components_empty = { "/list/entity?id=" },
)]
#[test_macro(tokio::test)]
async fn missing_entity_id_is_rejected_before_remote(uri: &str) {
    let (resources, server) = resource_server(Outcome::Succeed);

    let resp = server.get(uri).await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp).as_deref(), Some("application/json"));
    resp.assert_json(&serde_json::json!({ "message": "missing id (entity)" }));
    assert!(resources.calls().is_empty(), "remote called: {:?}", resources.calls());
}

#[parameterized(
    entity = { "/entity?id=pump-1" },
    workspaces = { "/list/workspaces" },
    scenes = { "/list/scenes" },
    options = { "/list/options" },
    components = { "/list/entity?id=pump-1" },
)]
#[test_macro(tokio::test)]
async fn remote_error_message_passes_through(uri: &str) {
    let message = "User: arn:aws:iam::1:user/x is not authorized to perform: iottwinmaker:*";
    let (resources, server) = resource_server(Outcome::Fail(message.into()));

    let resp = server.get(uri).await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp).as_deref(), Some("application/json"));
    resp.assert_json(&serde_json::json!({ "message": message }));
    assert_eq!(resources.calls().len(), 1);
}

#[tokio::test]
async fn get_entity_returns_payload_unwrapped() -> anyhow::Result<()> {
    let (resources, server) = resource_server(Outcome::Succeed);

    let resp = server.get("/entity?id=pump-1").await;
    resp.assert_status_ok();
    assert_eq!(content_type(&resp).as_deref(), Some("application/json"));
    resp.assert_json(&FakeResources::entity("pump-1"));
    assert_eq!(resources.calls(), vec!["get_entity:pump-1"]);
    Ok(())
}

#[parameterized(
    workspaces = { "/list/workspaces", "workspace", "list_workspaces" },
    scenes = { "/list/scenes", "scene", "list_scenes" },
    options = { "/list/options", "component-type", "list_options" },
    components = { "/list/entity?id=pump-1", "component", "list_entity:pump-1" },
)]
#[test_macro(tokio::test)]
async fn list_routes_return_options(uri: &str, prefix: &str, call: &str) {
    let (resources, server) = resource_server(Outcome::Succeed);

    let resp = server.get(uri).await;
    resp.assert_status_ok();
    let options: Vec<SelectableValue> = resp.json();
    assert_eq!(options, FakeResources::options(prefix));
    assert_eq!(resources.calls(), vec![call]);
}

#[tokio::test]
async fn routes_only_accept_get() -> anyhow::Result<()> {
    let (resources, server) = resource_server(Outcome::Succeed);

    let resp = server.post("/list/scenes").await;
    resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert!(resources.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn repeated_id_uses_first_value() -> anyhow::Result<()> {
    let (resources, server) = resource_server(Outcome::Succeed);

    let resp = server.get("/entity?id=pump-1&id=pump-2").await;
    resp.assert_status_ok();
    resp.assert_json(&FakeResources::entity("pump-1"));
    assert_eq!(resources.calls(), vec!["get_entity:pump-1"]);
    Ok(())
}

#[parameterized(
    empty_first = { "/entity?id=&id=pump-2" },
    bad_escape = { "/list/entity?id&%ZZ=1" },
)]
#[test_macro(tokio::test)]
async fn unusual_query_still_answers_json(uri: &str) {
    let (resources, server) = resource_server(Outcome::Succeed);

    let resp = server.get(uri).await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp).as_deref(), Some("application/json"));
    resp.assert_json(&serde_json::json!({ "message": "missing id (entity)" }));
    assert!(resources.calls().is_empty());
}

#[tokio::test]
async fn token_returns_remote_credentials() -> anyhow::Result<()> {
    let issuer = FakeIssuer::new(Outcome::Succeed);
    let ds = test_datasource(FakeResources::new(Outcome::Succeed), issuer.clone());
    let server = test_server(ds);

    let resp = server
        .get("/token")
        .add_header(
            HeaderName::from_static("x-grafana-user"),
            HeaderValue::from_static("admin"),
        )
        .await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert!(body["AccessKeyId"].as_str().is_some_and(|v| !v.is_empty()));
    assert!(body["SessionToken"].as_str().is_some_and(|v| !v.is_empty()));
    assert!(body["Expiration"].is_string());
    assert_eq!(issuer.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn token_failure_is_400_with_message() -> anyhow::Result<()> {
    let issuer = FakeIssuer::new(Outcome::Fail(INVALID_TOKEN.into()));
    let server = test_server(test_datasource(FakeResources::new(Outcome::Succeed), issuer));

    let resp = server.get("/token").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.assert_json(&serde_json::json!({ "message": INVALID_TOKEN }));
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let server = test_server(test_datasource(
        FakeResources::new(Outcome::Succeed),
        FakeIssuer::new(Outcome::Succeed),
    ));

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    resp.assert_json(&serde_json::json!({ "status": "OK", "message": "OK" }));
    Ok(())
}

#[tokio::test]
async fn health_reports_rejected_credentials() -> anyhow::Result<()> {
    let server = test_server(test_datasource(
        FakeResources::new(Outcome::Succeed),
        FakeIssuer::new(Outcome::Fail(INVALID_TOKEN.into())),
    ));

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    resp.assert_json(&serde_json::json!({ "status": "ERROR", "message": INVALID_TOKEN }));
    Ok(())
}

#[tokio::test]
async fn shutdown_fails_requests_instead_of_hanging() -> anyhow::Result<()> {
    let resources = FakeResources::new(Outcome::Hang);
    let ds = test_datasource(resources.clone(), FakeIssuer::new(Outcome::Succeed));
    ds.shutdown.cancel();
    let server = test_server(ds);

    let resp = server.get("/list/workspaces").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.assert_json(&serde_json::json!({ "message": "request cancelled" }));
    Ok(())
}
