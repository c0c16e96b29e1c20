//! Whole transit stack in one process
//!
//! Starts the four leaf services and the orchestrator on their configured
//! ports. All servers share one shutdown signal (Ctrl+C).
//!
//! Usage:
//!   cargo run --bin transit-stack
//!   curl -s 'localhost:3005/planTrip?zone=Centre'

use clap::Parser;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};
use transit_mesh::infra::{ctrl_c_shutdown, init_logging, Config, Metrics};
use transit_mesh::io::{bind, serve, serve_emergency};
use transit_mesh::services::{
    AirQualityRouter, AlertLog, AlertRelay, Orchestrator, OrchestratorRouter, PlaceDirectory,
    PlacesRouter, TransportDirectory, TransportRouter,
};

#[derive(Parser, Debug)]
#[command(name = "transit-stack", version, about = "Run every transit service in one process")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    init_logging(config.log_format());

    info!(version = %env!("GIT_HASH"), config_file = %config.config_file(), "transit-stack starting");

    let shutdown = ctrl_c_shutdown();
    let mut servers = JoinSet::new();

    let transport = Arc::new(TransportRouter::new(Arc::new(TransportDirectory::default())));
    servers.spawn(serve(bind(config.transport_port()).await?, transport, shutdown.clone()));

    let places = Arc::new(PlacesRouter::new(Arc::new(PlaceDirectory::default())));
    servers.spawn(serve(bind(config.places_port()).await?, places, shutdown.clone()));

    servers.spawn(serve(bind(config.air_port()).await?, Arc::new(AirQualityRouter), shutdown.clone()));

    let alerts = AlertRelay::new(Arc::new(AlertLog::new()));
    servers.spawn(serve_emergency(bind(config.alerts_port()).await?, alerts, shutdown.clone()));

    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
    let router = Arc::new(OrchestratorRouter::new(orchestrator, Arc::new(Metrics::new())));
    servers.spawn(serve(bind(config.orchestrator_port()).await?, router, shutdown));

    while let Some(joined) = servers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "server_failed"),
            Err(e) => error!(error = %e, "server_task_panicked"),
        }
    }

    info!("transit-stack shutdown complete");
    Ok(())
}
