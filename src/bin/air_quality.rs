//! Air quality service - the AQI rule exposed as `GET /aqi?zone=`
//!
//! Only needed when the orchestrator runs with `air.mode = "http"`.

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use transit_mesh::infra::{ctrl_c_shutdown, init_logging, Config};
use transit_mesh::io::{bind, serve};
use transit_mesh::services::AirQualityRouter;

#[derive(Parser, Debug)]
#[command(name = "air-quality", version, about = "Air quality readings per zone")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Listen port (overrides air.port)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    init_logging(config.log_format());

    let port = args.port.unwrap_or(config.air_port());
    info!(port = %port, "air-quality starting");
    serve(bind(port).await?, Arc::new(AirQualityRouter), ctrl_c_shutdown()).await
}
