//! Reel CLI
//!
//! Command-line interface for submitting prompts to the video-generation
//! backend and watching the jobs render.

mod commands;
mod id_resolver;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use reel_session::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reel")]
#[command(about = "Text-to-video job CLI", long_about = None)]
struct Cli {
    /// Backend URL
    #[arg(long, env = "REEL_BACKEND_URL", default_value = "http://localhost:8000")]
    backend_url: String,

    /// Seconds between job list refreshes
    #[arg(long, env = "REEL_POLL_INTERVAL", default_value_t = 5)]
    poll_interval: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "REEL_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout: u64,

    /// Maximum number of result fetches running at once
    #[arg(long, env = "REEL_MAX_FETCHES", default_value_t = 8)]
    max_fetches: usize,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered output on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel=info,reel_session=info,reel_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::new(cli.backend_url)
        .with_poll_interval(Duration::from_secs(cli.poll_interval))
        .with_request_timeout(Duration::from_secs(cli.request_timeout))
        .with_max_concurrent_fetches(cli.max_fetches);
    config.validate()?;

    handle_command(cli.command, &config).await
}
