// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Twinbridge: session-token broker and resource proxy for a digital-twin
//! workspace.

pub mod broker;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod health;
pub mod remote;
pub mod state;
pub mod test_support;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::BridgeConfig;
use crate::state::Datasource;
use crate::transport::build_router;

/// Run the bridge server until Ctrl-C.
pub async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    remote::install_crypto_provider();

    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();
    let ds = Arc::new(Datasource::connect(&config, shutdown.clone())?);

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
            }
            shutdown.cancel();
        });
    }

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        workspace_id = ds.workspace_id(),
        region = %ds.settings.region,
        "twinbridge listening on {addr}"
    );
    let router = build_router(ds);
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
