//! Places service - points of interest behind a GraphQL-style endpoint
//!
//! Usage:
//!   cargo run --bin places-service -- --port 3002
//!   curl -s localhost:3002/graphql -H 'content-type: application/json' \
//!     -d '{"query":"{ places(zone: $zone) { id name } }","variables":{"zone":"Lac"}}'

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use transit_mesh::infra::{ctrl_c_shutdown, init_logging, Config};
use transit_mesh::io::{bind, serve};
use transit_mesh::services::{PlaceDirectory, PlacesRouter};

#[derive(Parser, Debug)]
#[command(name = "places-service", version, about = "Places directory over GraphQL-style HTTP")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Listen port (overrides places.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    init_logging(config.log_format());

    let directory = Arc::new(PlaceDirectory::default());
    let router = Arc::new(PlacesRouter::new(directory));

    let port = args.port.unwrap_or(config.places_port());
    info!(port = %port, "places-service starting");
    serve(bind(port).await?, router, ctrl_c_shutdown()).await
}
