// ABOUTME: Foodgram API server binary
// ABOUTME: Loads configuration, opens the database, and serves the REST API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Foodgram Server Binary
//!
//! Configuration comes from the environment; `--http-port` overrides
//! `HTTP_PORT`.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use foodgram_server::{
    config::environment::ServerConfig, logging, resources::ServerResources,
    server::FoodgramServer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram - recipe sharing REST API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;
    info!("{}", config.summary());

    let port = config.http_port;
    let resources = Arc::new(ServerResources::from_config(config).await?);
    info!("Database ready");

    display_available_endpoints(&resources.config.host, port);

    if let Err(e) = FoodgramServer::new(resources).run(port).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}

#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(host: &str, port: u16) {
    info!("=== Available API Endpoints ===");
    info!("   Token login:      POST http://{host}:{port}/api/auth/token/login/");
    info!("   Users:            GET  http://{host}:{port}/api/users/");
    info!("   Tags:             GET  http://{host}:{port}/api/tags/");
    info!("   Ingredients:      GET  http://{host}:{port}/api/ingredients/");
    info!("   Recipes:          GET  http://{host}:{port}/api/recipes/");
    info!("   Shopping list:    GET  http://{host}:{port}/api/recipes/download_shopping_cart/");
    info!("   Health:           GET  http://{host}:{port}/health");
    info!("=== End of Endpoint List ===");
}
