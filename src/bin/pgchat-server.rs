// ABOUTME: Chat server binary: streams essay-grounded replies and serves shared conversations
// ABOUTME: Loads environment configuration, initializes logging and the store, then serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # PG Chat Server Binary
//!
//! Starts the HTTP server exposing the chat stream, conversation sharing,
//! and health endpoints.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pgchat_server::{
    config::ServerConfig,
    constants::endpoints,
    logging,
    resources::ServerResources,
    server,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pgchat-server")]
#[command(about = "PG Chat - streaming essay chat server with shareable conversations")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    info!("Starting PG Chat server");
    info!("{}", config.summary());
    display_available_endpoints(&config);

    let resources = Arc::new(ServerResources::from_config(config).await?);
    info!(store = resources.store.backend_name(), "Store initialized");

    if let Err(e) = server::run(resources).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}:{}", config.host, config.http_port);
    info!("=== Available API Endpoints ===");
    info!("   Chat stream:       POST {base}{}", endpoints::CHAT);
    info!("   Share chat:        POST {base}{}", endpoints::SHARE);
    info!("   Shared chat:       GET  {base}/chat/{{id}}");
    info!("   Health:            GET  {base}{}", endpoints::HEALTH);
    info!("   Readiness:         GET  {base}{}", endpoints::READY);
    info!("=== End of Endpoint List ===");
}
