// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! NFT Holder Checker
//!
//! Verifies NFT collection ownership for batches of wallet addresses.

use anyhow::Result;
use api::{Server, ServerConfig, ShutdownConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting NFT holder checker");

    let config = ServerConfig::from_env()?;

    let server = Server::new(config, ShutdownConfig::default())?;

    // NOTE: the `#[tokio::main]` task does not run a worker future, we must spawn
    tokio::spawn(async move { server.run().await }).await??;

    Ok(())
}
