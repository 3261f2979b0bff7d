// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST-JSON client for the digital-twin workspace API.

use futures_util::future::BoxFuture;
use reqwest::Method;

use crate::config::DatasourceSettings;
use crate::remote::client::SignedClient;
use crate::remote::credentials::StaticCredentials;
use crate::remote::{ResourceClient, SelectableValue};

const SERVICE: &str = "iottwinmaker";

/// Resource queries bound to one workspace.
pub struct TwinMakerClient {
    client: SignedClient,
    workspace_id: String,
}

impl TwinMakerClient {
    pub fn new(
        settings: &DatasourceSettings,
        credentials: StaticCredentials,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: SignedClient::new(
                settings.resource_endpoint(),
                settings.region.clone(),
                SERVICE,
                credentials,
            )?,
            workspace_id: settings.workspace_id.clone(),
        })
    }

    fn workspace_path(&self, suffix: &str) -> String {
        format!("/workspaces/{}{suffix}", urlencoding::encode(&self.workspace_id))
    }

    async fn fetch_entity(&self, entity_id: &str) -> anyhow::Result<serde_json::Value> {
        let path = self.workspace_path(&format!("/entities/{}", urlencoding::encode(entity_id)));
        self.client.send_json(Method::GET, &path, &serde_json::Value::Null).await
    }

    async fn fetch_workspaces(&self) -> anyhow::Result<Vec<SelectableValue>> {
        let body = self.client.send_json(Method::POST, "/workspaces-list", &empty()).await?;
        Ok(summaries(&body, "workspaceSummaries", "workspaceId", |summary| {
            text(summary, "description").or_else(|| text(summary, "arn"))
        }))
    }

    async fn fetch_scenes(&self) -> anyhow::Result<Vec<SelectableValue>> {
        let path = self.workspace_path("/scenes-list");
        let body = self.client.send_json(Method::POST, &path, &empty()).await?;
        Ok(summaries(&body, "sceneSummaries", "sceneId", |summary| text(summary, "description")))
    }

    async fn fetch_component_types(&self) -> anyhow::Result<Vec<SelectableValue>> {
        let path = self.workspace_path("/component-types-list");
        let body = self.client.send_json(Method::POST, &path, &empty()).await?;
        Ok(summaries(&body, "componentTypeSummaries", "componentTypeId", |summary| {
            text(summary, "description")
        }))
    }

    async fn fetch_entity_components(
        &self,
        entity_id: &str,
    ) -> anyhow::Result<Vec<SelectableValue>> {
        let entity = self.fetch_entity(entity_id).await?;
        Ok(component_options(&entity))
    }
}

impl ResourceClient for TwinMakerClient {
    fn get_entity<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<serde_json::Value>> {
        Box::pin(self.fetch_entity(entity_id))
    }

    fn list_workspaces(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>> {
        Box::pin(self.fetch_workspaces())
    }

    fn list_scenes(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>> {
        Box::pin(self.fetch_scenes())
    }

    fn list_options(&self) -> BoxFuture<'_, anyhow::Result<Vec<SelectableValue>>> {
        Box::pin(self.fetch_component_types())
    }

    fn list_entity<'a>(
        &'a self,
        entity_id: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Vec<SelectableValue>>> {
        Box::pin(self.fetch_entity_components(entity_id))
    }
}

fn empty() -> serde_json::Value {
    serde_json::json!({})
}

fn text(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Map a list-response array to options keyed by `id_field`.
fn summaries(
    body: &serde_json::Value,
    list_field: &str,
    id_field: &str,
    description: impl Fn(&serde_json::Value) -> Option<String>,
) -> Vec<SelectableValue> {
    body.get(list_field)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    text(item, id_field).map(|id| SelectableValue::new(id, description(item)))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// One option per component of an entity, sorted by component name.
pub fn component_options(entity: &serde_json::Value) -> Vec<SelectableValue> {
    let Some(components) = entity.get("components").and_then(|v| v.as_object()) else {
        return Vec::new();
    };
    let mut options: Vec<SelectableValue> = components
        .iter()
        .map(|(name, component)| {
            SelectableValue::new(name.clone(), text(component, "componentTypeId"))
        })
        .collect();
    options.sort_by(|a, b| a.value.cmp(&b.value));
    options
}

#[cfg(test)]
#[path = "twinmaker_tests.rs"]
mod tests;
