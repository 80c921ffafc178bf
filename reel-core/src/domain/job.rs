//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque job identifier issued by the backend
///
/// Stable for the lifetime of a job. The client never inspects its format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive prefix match, used to resolve short ids typed by a user
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.0.to_lowercase().starts_with(&prefix.to_lowercase())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A prompt-to-video generation request as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub prompt: String,
    /// Requested frame count; `None` means the backend default applies
    pub frame_count: Option<u32>,
    pub status: JobStatus,
    /// Error text reported by the backend, only set when `status` is `Failed`
    pub failure_detail: Option<String>,
}

impl Job {
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

/// Job execution status
///
/// `Pending -> Running -> {Completed, Failed}`. Observers must not assume
/// `Running` is ever seen: a fast job can go straight from `Pending` to a
/// terminal state between two polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    /// The backend worker writes `PROCESSING` while rendering
    #[serde(alias = "PROCESSING")]
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
