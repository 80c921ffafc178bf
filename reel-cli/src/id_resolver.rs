//! ID resolver module
//!
//! Resolves job id prefixes typed by the user to full job ids, so users can
//! type a short, unambiguous prefix instead of a full id.

use anyhow::{Result, anyhow};
use reel_core::domain::job::{Job, JobId};

/// Resolve a job ID or prefix against a job list
///
/// An exact id match wins even if it is also a prefix of other ids.
///
/// # Errors
/// Returns an error if:
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
pub fn resolve_job_id(jobs: &[Job], id_or_prefix: &str) -> Result<JobId> {
    let wanted = id_or_prefix.trim();
    if wanted.is_empty() {
        return Err(anyhow!("Job ID must not be empty"));
    }

    if let Some(job) = jobs.iter().find(|j| j.id.as_str() == wanted) {
        return Ok(job.id.clone());
    }

    let matches: Vec<&Job> = jobs.iter().filter(|j| j.id.matches_prefix(wanted)).collect();

    match matches.len() {
        0 => Err(anyhow!("No job found with ID starting with '{}'", wanted)),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let ids: Vec<String> = matches.iter().map(|j| j.id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                wanted,
                ids.join(", ")
            ))
        }
    }
}
