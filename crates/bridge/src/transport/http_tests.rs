// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;

use axum::body::to_bytes;
use axum::http::StatusCode;

use super::*;

async fn body_json(resp: Response) -> anyhow::Result<serde_json::Value> {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn content_type(resp: &Response) -> Option<&str> {
    resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn success_writes_payload_unwrapped() -> anyhow::Result<()> {
    let resp = respond(Ok(serde_json::json!({ "entityId": "pump-1" })));
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), Some("application/json"));
    assert_eq!(body_json(resp).await?, serde_json::json!({ "entityId": "pump-1" }));
    Ok(())
}

#[tokio::test]
async fn failure_writes_message_body() -> anyhow::Result<()> {
    let resp = respond::<()>(Err(DispatchError::MissingEntityId));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp), Some("application/json"));
    assert_eq!(body_json(resp).await?, serde_json::json!({ "message": "missing id (entity)" }));
    Ok(())
}

#[tokio::test]
async fn unencodable_payload_still_responds() -> anyhow::Result<()> {
    let mut payload = BTreeMap::new();
    payload.insert(vec![1u8], 1u8);

    let resp = respond(Ok(payload));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await?;
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()), "got {body}");
    Ok(())
}

fn pairs(items: &[(&str, &str)]) -> QueryPairs {
    items.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn entity_id_takes_first_value() {
    assert_eq!(entity_id(&pairs(&[])), None);
    assert_eq!(entity_id(&pairs(&[("other", "x")])), None);
    assert_eq!(entity_id(&pairs(&[("id", "a"), ("id", "b")])), Some("a"));
    assert_eq!(entity_id(&pairs(&[("id", ""), ("id", "b")])), Some(""));
}

#[test]
fn caller_comes_from_frontend_header() -> anyhow::Result<()> {
    let mut headers = HeaderMap::new();
    assert_eq!(caller(&headers), None);

    headers.insert(CALLER_HEADER, "".parse()?);
    assert_eq!(caller(&headers), None);

    headers.insert(CALLER_HEADER, "admin".parse()?);
    assert_eq!(caller(&headers).as_deref(), Some("admin"));
    Ok(())
}
