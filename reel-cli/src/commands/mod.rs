//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod watch;

use anyhow::Result;
use clap::Subcommand;
use reel_client::JobBackend;
use reel_core::validation::DEFAULT_FRAME_COUNT;
use reel_session::Config;
use std::sync::Arc;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a prompt for generation
    Submit {
        /// Text prompt describing the video
        prompt: String,

        /// Number of frames to generate
        #[arg(short, long, default_value_t = DEFAULT_FRAME_COUNT.to_string())]
        frames: String,
    },
    /// List jobs with their results
    List {
        /// Maximum number of jobs to print
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Show the result of a single job
    Result {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Watch jobs until interrupted
    Watch {
        /// Maximum number of jobs to print
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let backend: Arc<dyn JobBackend> = Arc::new(config.connect()?);

    match command {
        Commands::Submit { prompt, frames } => {
            job::submit_job(config, backend, &prompt, &frames).await
        }
        Commands::List { limit } => job::list_jobs(config, backend, limit).await,
        Commands::Result { id } => job::show_result(backend.as_ref(), &id).await,
        Commands::Watch { limit } => watch::watch_jobs(config, backend, limit).await,
    }
}
