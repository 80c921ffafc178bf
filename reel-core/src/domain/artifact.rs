//! Artifact domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::JobId;

/// Resolved output location of a completed job
///
/// Created once, when the result endpoint first returns a url for the job,
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub job_id: JobId,
    /// Playable/downloadable url of the generated video
    pub url: String,
    pub resolved_at: DateTime<Utc>,
}

impl ArtifactRef {
    pub fn new(job_id: JobId, url: impl Into<String>) -> Self {
        Self {
            job_id,
            url: url.into(),
            resolved_at: Utc::now(),
        }
    }

    /// Suggested file name when downloading the artifact
    pub fn download_name(&self) -> String {
        format!("video-{}.mp4", self.job_id)
    }
}
