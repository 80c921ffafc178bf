//! Terminal rendering of the client state
//!
//! Pure consumers of [`ClientState`] snapshots; nothing here writes state.

use colored::*;
use reel_core::domain::artifact::ArtifactRef;
use reel_core::domain::job::{Job, JobStatus};
use reel_session::{ClientState, Config};

/// Clear the terminal and move the cursor home
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

/// Header shown above the job list in watch mode
pub fn print_watch_header(config: &Config, state: &ClientState) {
    println!("{}", "Text-to-Video Jobs".bold());
    println!(
        "{}",
        format!(
            "{} | refresh every {:?} | Ctrl-C to quit",
            config.backend_url, config.poll_interval
        )
        .dimmed()
    );
    if let Some(at) = state.refreshed_at {
        println!(
            "{}",
            format!("Last update: {}", at.format("%H:%M:%S")).dimmed()
        );
    }
    if let Some(error) = &state.poll_error {
        println!("{}", format!("⚠ Refresh failed: {}", error).yellow());
    }
    println!("{}", "─".repeat(80).dimmed());
}

/// Print up to `limit` jobs with their artifacts
pub fn print_job_list(state: &ClientState, limit: usize) {
    if state.jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
        return;
    }

    println!("{}", format!("Found {} job(s):", state.jobs.len()).bold());
    println!();

    for job in state.jobs.iter().take(limit) {
        print_job(job, state.artifact(&job.id));
    }

    let hidden = state.jobs.len().saturating_sub(limit);
    if hidden > 0 {
        println!("{}", format!("… and {} more", hidden).dimmed());
    }
}

/// Print a single job
pub fn print_job(job: &Job, artifact: Option<&ArtifactRef>) {
    println!("  {} {}", "▸".cyan(), job.prompt.bold());
    println!("    ID:      {}", job.id.to_string().dimmed());
    println!("    Status:  {}", colorize_status(job.status));
    println!("    Frames:  {}", frames_label(job.frame_count));

    match (job.status, artifact) {
        (JobStatus::Completed, Some(artifact)) => {
            println!("    Video:   {}", artifact.url.green());
            println!(
                "    Save as: {}",
                artifact.download_name().dimmed()
            );
        }
        (JobStatus::Completed, None) => {
            println!("    Video:   {}", "resolving…".dimmed());
        }
        (JobStatus::Failed, _) => {
            let detail = job
                .failure_detail
                .as_deref()
                .unwrap_or("generation failed");
            println!("    Error:   {}", detail.red());
        }
        _ => {}
    }
    println!();
}

fn frames_label(frame_count: Option<u32>) -> String {
    match frame_count {
        Some(frames) => frames.to_string(),
        None => "default".to_string(),
    }
}

/// Colorize job status for display
fn colorize_status(status: JobStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        JobStatus::Pending => label.yellow(),
        JobStatus::Running => label.cyan(),
        JobStatus::Completed => label.green(),
        JobStatus::Failed => label.red(),
    }
}
