//! Montage CLI
//!
//! Command-line front end for the Montage gateway: uploads clips, waits for
//! processing and browses the resulting videos.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "montage")]
#[command(about = "Upload clips to Montage and track their processing", long_about = None)]
struct Cli {
    /// Gateway URL
    #[arg(long, env = "MONTAGE_GATEWAY_URL")]
    gateway_url: String,

    /// Owner key to upload and list under
    #[arg(long, env = "MONTAGE_OWNER", conflicts_with = "email")]
    owner: Option<String>,

    /// Email address to derive the owner key from
    #[arg(long, env = "MONTAGE_EMAIL")]
    email: Option<String>,

    /// Seconds between two status queries
    #[arg(long, env = "MONTAGE_POLL_INTERVAL", default_value_t = 10)]
    poll_interval: u64,

    /// Seconds to wait for processing before giving up
    #[arg(long, env = "MONTAGE_MAX_WAIT", default_value_t = 1800)]
    max_wait: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, results to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "montage=info,montage_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_args(
        cli.gateway_url,
        cli.owner,
        cli.email,
        cli.poll_interval,
        cli.max_wait,
    )?;

    handle_command(cli.command, &config).await
}
