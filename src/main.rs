//! Transit orchestrator - one HTTP front composing the leaf services
//!
//! Plans trips from air quality, transport availability and places, and
//! forwards emergency alerts to the relay.
//!
//! Module structure:
//! - `domain/` - Transit entities (zones, places, lines, alerts)
//! - `io/` - HTTP server, wire protocols and upstream clients
//! - `services/` - Leaf directories and the orchestrator
//! - `infra/` - Config, logging, metrics, shutdown

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use transit_mesh::infra::{ctrl_c_shutdown, init_logging, AirMode, Config, Metrics};
use transit_mesh::io::{bind, serve};
use transit_mesh::services::{Orchestrator, OrchestratorRouter};

/// Transit orchestrator - trip planning across the transit leaf services
#[derive(Parser, Debug)]
#[command(name = "transit-orchestrator", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Listen port (overrides orchestrator.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    init_logging(config.log_format());

    info!(version = %env!("GIT_HASH"), "transit-orchestrator starting");

    let air_mode = match config.air_mode() {
        AirMode::Local => "local",
        AirMode::Http => "http",
    };
    info!(
        config_file = %config.config_file(),
        default_zone = %config.default_zone(),
        aqi_threshold = %config.aqi_threshold(),
        fallback_zone = %config.fallback_zone(),
        upstream_timeout_ms = %config.upstream_timeout_ms(),
        air_mode = %air_mode,
        transport_url = %config.transport_url(),
        places_url = %config.places_url(),
        alerts_url = %config.alerts_url(),
        "config_loaded"
    );

    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
    let metrics = Arc::new(Metrics::new());
    let router = Arc::new(OrchestratorRouter::new(orchestrator, metrics));

    let port = args.port.unwrap_or(config.orchestrator_port());
    let listener = bind(port).await?;

    serve(listener, router, ctrl_c_shutdown()).await?;

    info!("transit-orchestrator shutdown complete");
    Ok(())
}
