//! Relay Dashboard
//!
//! Serves the dashboard API and forwards relay commands to the GPIO controller
//! configured via RELAY_API_ENDPOINT (or at runtime from the dashboard).

use anyhow::Result;
use relay_dashboard::adapters::GpioClient;
use relay_dashboard::api::{self, AppState};
use relay_dashboard::config::{self, EndpointConfig};
use relay_dashboard::proxy::RelayProxy;
use relay_dashboard::relays::RelayStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "relay_dashboard=debug,tower_http=debug,axum::rejection=trace".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Relay Dashboard");

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(?config, "Configuration loaded");

    if config.api_endpoint.is_none() {
        tracing::warn!("RELAY_API_ENDPOINT not set; configure the endpoint from the dashboard");
    }

    let endpoint = EndpointConfig::new(config.api_endpoint.clone());
    let client = GpioClient::new(endpoint, config.timeout());
    let relays = Arc::new(RelayStore::new(&config.pins));
    tracing::info!("Relay store seeded with GPIO pins {:?}", config.pins);

    let app = api::router(AppState::new(RelayProxy::new(client, relays)))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        signal.cancel();
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Relay Dashboard stopped");
    Ok(())
}
