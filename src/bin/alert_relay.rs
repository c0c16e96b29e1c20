//! Alert relay - append-only emergency alert log served over gRPC
//!
//! Exposes `emergency.EmergencyService` (SendAlert, GetAlerts) and the
//! standard `grpc.health.v1.Health` service.
//!
//! Usage:
//!   cargo run --bin alert-relay -- --port 3004
//!   cargo run --bin alertctl -- send --zone Centre --message "Test fire"

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use transit_mesh::infra::{ctrl_c_shutdown, init_logging, Config};
use transit_mesh::io::{bind, serve_emergency};
use transit_mesh::services::{AlertLog, AlertRelay};

#[derive(Parser, Debug)]
#[command(name = "alert-relay", version, about = "Emergency alert relay")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Listen port (overrides alerts.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    init_logging(config.log_format());

    let relay = AlertRelay::new(Arc::new(AlertLog::new()));

    let port = args.port.unwrap_or(config.alerts_port());
    info!(port = %port, "alert-relay starting");
    serve_emergency(bind(port).await?, relay, ctrl_c_shutdown()).await
}
