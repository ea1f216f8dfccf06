//! # Tide Bot Application Entry Point
//!
//! Loads configuration, verifies the Twitter credentials once, and serves the
//! HTTP front end. A failed credential check is logged and the server still
//! starts; `/tide` then answers `503` until the process is restarted with
//! working credentials.

use anyhow::Context;
use std::sync::Arc;
use tide_bot_lib::{
    config::Config,
    credentials::Credentials,
    server::{self, AppState, Publisher},
    tide_data::NoaaClient,
    twitter::{PublishError, TwitterClient},
};

/// Read credentials from the environment and verify them with Twitter.
async fn connect_publisher(config: &Config) -> Result<TwitterClient, PublishError> {
    let credentials = Credentials::from_env()?;
    TwitterClient::connect(&credentials, &config.twitter).await
}

/// Main application entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Seattle Tide Twitter Bot - @seattletidedata");

    let config = Config::load();

    let source = NoaaClient::new(config.station.clone(), config.noaa.clone())
        .context("building NOAA client")?;

    let publisher: Option<Arc<dyn Publisher>> = match connect_publisher(&config).await {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            log::error!("Error getting Twitter client: {}", e);
            log::warn!("Starting without a publisher; /tide will answer 503");
            None
        }
    };

    let state = AppState::new(Arc::new(source), publisher, config.station.name.clone());

    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("invalid listen address {}", config.server.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    log::info!("Listening on {}", addr);

    axum::serve(listener, server::router(state))
        .await
        .context("HTTP server error")?;

    Ok(())
}
