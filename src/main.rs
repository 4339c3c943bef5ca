//! Edge proxy binary for the A2 parking citation map.
//!
//! ```text
//!                    ┌─────────────────────────────────────────────────┐
//!                    │                  EDGE PROXY                     │
//!  Browser ────────▶ │  /api/*         → citation backend, + CORS      │
//!                    │  /a2-parking    → 301 /a2-parking/              │
//!                    │  /a2-parking/*  → citation backend, prefix      │
//!                    │                   stripped                      │
//!                    │  anything else  → passthrough origin, or 404    │
//!                    └─────────────────────────────────────────────────┘
//! ```
//!
//! The proxy is stateless across requests. The one operationally interesting
//! knob is the upstream origin, injectable by flag or environment variable
//! without a config file; everything else has workable defaults.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use parking_edge::config::{self, ConfigError, EdgeConfig};
use parking_edge::http::HttpServer;
use parking_edge::lifecycle::{signals, Shutdown};
use parking_edge::observability::metrics;

#[derive(Parser)]
#[command(
    name = "parking-edge",
    about = "Edge proxy for the A2 parking citation map"
)]
struct Args {
    /// Path to the TOML configuration file (defaults apply without one).
    #[arg(short, long, env = "EDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Upstream origin override, e.g. "https://backend.example.com".
    #[arg(long, env = "EDGE_UPSTREAM_ORIGIN")]
    upstream_origin: Option<String>,

    /// Listener bind address override, e.g. "0.0.0.0:8080".
    #[arg(long, env = "EDGE_BIND_ADDRESS")]
    bind_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => EdgeConfig::default(),
    };
    if let Some(origin) = args.upstream_origin {
        config.upstream.origin = origin;
    }
    if let Some(address) = args.bind_address {
        config.listener.bind_address = address;
    }

    init_tracing(&config.observability.log_level);

    if let Err(errors) = config::validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        return Err(ConfigError::Validation(errors).into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_origin = %config.upstream.origin,
        app_prefix = %config.routing.app_prefix,
        passthrough = config.passthrough.origin.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address shape is guaranteed by validation above.
        if let Ok(address) = config.observability.metrics_address.parse() {
            metrics::init_metrics(address);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(&config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let default_filter = format!("parking_edge={log_level},tower_http={log_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
