// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration for the twinbridge server.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "twinbridge", version, about = "Resource bridge for digital-twin workspaces")]
pub struct BridgeConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "TWINBRIDGE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 9810, env = "TWINBRIDGE_PORT")]
    pub port: u16,

    /// Deadline applied to every remote call, in milliseconds.
    #[arg(long, default_value_t = 30000, env = "TWINBRIDGE_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: u64,

    /// Log format (json or text).
    #[arg(long, default_value = "text", env = "TWINBRIDGE_LOG_FORMAT")]
    pub log_format: String,

    /// JSON file with datasource settings. Takes precedence over the
    /// individual settings flags.
    #[arg(long, env = "TWINBRIDGE_SETTINGS_FILE")]
    pub settings_file: Option<PathBuf>,

    #[command(flatten)]
    pub settings: DatasourceSettings,
}

impl BridgeConfig {
    /// Resolve the effective datasource settings and validate them.
    pub fn datasource_settings(&self) -> anyhow::Result<DatasourceSettings> {
        let settings = match &self.settings_file {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("failed to read settings file {}: {e}", path.display())
                })?;
                serde_json::from_str::<DatasourceSettings>(&contents)?
            }
            None => self.settings.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// How the bridge authenticates against the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Explicit access/secret key pair from settings.
    Keys,
    /// Standard `AWS_*` environment variables of the process.
    Default,
}

/// Authentication settings and the bound workspace, fixed for the
/// lifetime of the datasource.
#[derive(Clone, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceSettings {
    /// Credential source.
    #[arg(long, value_enum, default_value_t = AuthType::Default, env = "TWINBRIDGE_AUTH_TYPE")]
    #[serde(default = "default_auth_type")]
    pub auth_type: AuthType,

    /// Access key id (required with `--auth-type keys`).
    #[arg(long, env = "TWINBRIDGE_ACCESS_KEY")]
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret access key (required with `--auth-type keys`).
    #[arg(long, env = "TWINBRIDGE_SECRET_KEY", hide_env_values = true)]
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Remote region.
    #[arg(long, default_value = "us-east-1", env = "TWINBRIDGE_REGION")]
    #[serde(default = "default_region")]
    pub region: String,

    /// Workspace every token and query is scoped to.
    #[arg(long, default_value = "", env = "TWINBRIDGE_WORKSPACE_ID")]
    pub workspace_id: String,

    /// Role to assume when issuing session tokens. Tokens are then limited
    /// to read access on the bound workspace.
    #[arg(long, env = "TWINBRIDGE_ASSUME_ROLE_ARN")]
    #[serde(default)]
    pub assume_role_arn: Option<String>,

    /// Override for the resource API base URL.
    #[arg(long, env = "TWINBRIDGE_ENDPOINT")]
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Override for the token service base URL.
    #[arg(long, env = "TWINBRIDGE_STS_ENDPOINT")]
    #[serde(default)]
    pub sts_endpoint: Option<String>,
}

fn default_auth_type() -> AuthType {
    AuthType::Default
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

impl DatasourceSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workspace_id.trim().is_empty() {
            anyhow::bail!("--workspace-id is required");
        }
        if self.region.trim().is_empty() {
            anyhow::bail!("--region must not be empty");
        }
        if self.auth_type == AuthType::Keys {
            if self.access_key.as_deref().is_none_or(str::is_empty) {
                anyhow::bail!("--access-key is required with --auth-type keys");
            }
            if self.secret_key.as_deref().is_none_or(str::is_empty) {
                anyhow::bail!("--secret-key is required with --auth-type keys");
            }
        }
        Ok(())
    }

    /// Base URL of the resource API.
    pub fn resource_endpoint(&self) -> String {
        match &self.endpoint {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!("https://api.iottwinmaker.{}.amazonaws.com", self.region),
        }
    }

    /// Base URL of the token service.
    pub fn sts_endpoint(&self) -> String {
        match &self.sts_endpoint {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!("https://sts.{}.amazonaws.com", self.region),
        }
    }
}

impl fmt::Debug for DatasourceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasourceSettings")
            .field("auth_type", &self.auth_type)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field("workspace_id", &self.workspace_id)
            .field("assume_role_arn", &self.assume_role_arn)
            .field("endpoint", &self.endpoint)
            .field("sts_endpoint", &self.sts_endpoint)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
