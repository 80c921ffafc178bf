//! Job command handlers
//!
//! One-shot commands: submit a prompt, list jobs, show a single result.

use anyhow::{Context, Result};
use colored::*;
use reel_client::JobBackend;
use reel_core::domain::job::JobStatus;
use reel_session::{Config, JobPoller, RefreshOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::id_resolver::resolve_job_id;
use crate::render;

/// Submit a prompt and print the refreshed job list
pub async fn submit_job(
    config: &Config,
    backend: Arc<dyn JobBackend>,
    prompt: &str,
    frames: &str,
) -> Result<()> {
    let poller = JobPoller::from_config(config, backend, CancellationToken::new());

    let job_id = poller
        .submit(prompt, frames)
        .await
        .context("Job was not submitted")?;

    match job_id {
        Some(id) => println!("{} Submitted job {}", "✓".green(), id.to_string().cyan()),
        None => println!("{} Submitted job", "✓".green()),
    }
    println!();

    render::print_job_list(&poller.store().snapshot(), usize::MAX);

    Ok(())
}

/// Fetch the job list once, resolve new results and print everything
pub async fn list_jobs(config: &Config, backend: Arc<dyn JobBackend>, limit: usize) -> Result<()> {
    let poller = JobPoller::from_config(config, backend, CancellationToken::new());

    let outcome = poller.refresh().await.context("Failed to fetch jobs")?;
    if let RefreshOutcome::Applied { pass, .. } = outcome {
        pass.settled().await;
    }

    render::print_job_list(&poller.store().snapshot(), limit);

    Ok(())
}

/// Show the result of one job, resolving an id prefix first
pub async fn show_result(backend: &dyn JobBackend, id: &str) -> Result<()> {
    let jobs = backend
        .list_jobs()
        .await
        .context("Failed to fetch jobs for ID resolution")?;
    let job_id = resolve_job_id(&jobs, id)?;

    let Some(job) = jobs.iter().find(|j| j.id == job_id) else {
        anyhow::bail!("Job {} disappeared while resolving", job_id);
    };

    match job.status {
        JobStatus::Completed => {
            let artifact = backend
                .fetch_result(&job.id)
                .await
                .context("Failed to fetch job result")?;
            render::print_job(job, artifact.as_ref());
            if artifact.is_none() {
                println!("{}", "Result is not available yet.".yellow());
            }
        }
        JobStatus::Failed => render::print_job(job, None),
        JobStatus::Pending | JobStatus::Running => {
            render::print_job(job, None);
            println!("{}", "Job has not finished yet.".yellow());
        }
    }

    Ok(())
}
