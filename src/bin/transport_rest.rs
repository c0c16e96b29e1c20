//! Transport REST service - lines, timetables, traffic and connections
//!
//! Usage:
//!   cargo run --bin transport-rest -- --port 3001

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use transit_mesh::infra::{ctrl_c_shutdown, init_logging, Config};
use transit_mesh::io::{bind, serve};
use transit_mesh::services::{TransportDirectory, TransportRouter};

#[derive(Parser, Debug)]
#[command(name = "transport-rest", version, about = "Transport directory over REST")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Listen port (overrides transport.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    init_logging(config.log_format());

    let directory = Arc::new(TransportDirectory::default());
    let router = Arc::new(TransportRouter::new(directory));

    let port = args.port.unwrap_or(config.transport_port());
    info!(port = %port, "transport-rest starting");
    serve(bind(port).await?, router, ctrl_c_shutdown()).await
}
