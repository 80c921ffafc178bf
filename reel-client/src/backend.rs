//! Backend abstraction
//!
//! The reconciliation core only needs three operations from the backend.
//! Keeping them behind a trait lets the core run against a scripted fake.

use async_trait::async_trait;
use reel_core::domain::artifact::ArtifactRef;
use reel_core::domain::job::{Job, JobId};
use reel_core::dto::job::CreateJob;

use crate::BackendClient;
use crate::error::Result;

/// Operations the job watcher needs from the video-generation backend
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Fetch the full, ordered job list
    async fn list_jobs(&self) -> Result<Vec<Job>>;

    /// Submit a validated job
    ///
    /// # Returns
    /// The new job id when the backend reports one
    async fn submit_job(&self, req: &CreateJob) -> Result<Option<JobId>>;

    /// Fetch the artifact of a completed job
    ///
    /// # Returns
    /// `None` while the backend has no url for the job
    async fn fetch_result(&self, job_id: &JobId) -> Result<Option<ArtifactRef>>;
}

#[async_trait]
impl JobBackend for BackendClient {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        BackendClient::list_jobs(self).await
    }

    async fn submit_job(&self, req: &CreateJob) -> Result<Option<JobId>> {
        BackendClient::submit_job(self, req).await
    }

    async fn fetch_result(&self, job_id: &JobId) -> Result<Option<ArtifactRef>> {
        BackendClient::fetch_result(self, job_id).await
    }
}
