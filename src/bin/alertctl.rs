//! Command-line client for the alert relay
//!
//! Usage:
//!   cargo run --bin alertctl -- send --zone Centre --message "Test fire" --priority 1
//!   cargo run --bin alertctl -- list
//!   cargo run --bin alertctl -- --url http://relay:3004 list

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;
use transit_mesh::domain::AlertRequest;
use transit_mesh::infra::Config;
use transit_mesh::io::AlertRelayClient;
use transit_mesh::services::orchestrator::AlertUpstream;

#[derive(Parser, Debug)]
#[command(name = "alertctl", version, about = "Send and list emergency alerts")]
struct Args {
    /// Path to TOML configuration file (for alerts.url)
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,

    /// Relay base URL (overrides alerts.url)
    #[arg(short, long)]
    url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one alert
    Send {
        #[arg(short, long)]
        zone: String,

        #[arg(short, long)]
        message: String,

        #[arg(short, long, default_value = "1")]
        priority: i32,
    },
    /// Print every recorded alert
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load_from_path(&args.config);
    let url = args.url.as_deref().unwrap_or(config.alerts_url());

    let client = AlertRelayClient::new(url, Duration::from_millis(args.timeout_ms))
        .context("Failed to build gRPC channel")?;

    match args.command {
        Command::Send { zone, message, priority } => {
            let ack = client
                .send_alert(&AlertRequest { zone, message, priority })
                .await
                .with_context(|| format!("SendAlert to {url} failed"))?;
            println!("{}", serde_json::to_string_pretty(&ack)?);
        }
        Command::List => {
            let list = client.list_alerts().await.with_context(|| format!("GetAlerts from {url} failed"))?;
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }

    Ok(())
}
