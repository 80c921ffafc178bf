//! Job-related API endpoints

use reel_core::domain::artifact::ArtifactRef;
use reel_core::domain::job::{Job, JobId};
use reel_core::dto::job::{CreateJob, JobRecord, ResultResponse, SubmitResponse};
use tracing::debug;

use crate::BackendClient;
use crate::error::Result;

impl BackendClient {
    /// List all jobs known to the backend
    ///
    /// # Returns
    /// Every job, in the order the backend reported them
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let url = self.endpoint(&["jobs"])?;
        let response = self.client.get(url).send().await?;

        let records: Vec<JobRecord> = self.handle_response(response).await?;
        Ok(records.into_iter().map(Job::from).collect())
    }

    /// Submit a new generation job
    ///
    /// # Arguments
    /// * `req` - The validated submission body
    ///
    /// # Returns
    /// The id of the new job, when the backend includes it in the response
    pub async fn submit_job(&self, req: &CreateJob) -> Result<Option<JobId>> {
        let url = self.endpoint(&["jobs"])?;
        let response = self.client.post(url).json(req).send().await?;
        let response = self.check_status(response).await?;

        // Any 2xx means accepted; the id in the body is informational
        let body = response.bytes().await?;
        let job_id = serde_json::from_slice::<SubmitResponse>(&body)
            .ok()
            .and_then(|r| r.job_id);

        Ok(job_id)
    }

    /// Fetch the artifact of a job
    ///
    /// # Arguments
    /// * `job_id` - The job to resolve
    ///
    /// # Returns
    /// The artifact, or `None` if the backend has no url for it yet
    pub async fn fetch_result(&self, job_id: &JobId) -> Result<Option<ArtifactRef>> {
        let url = self.endpoint(&["jobs", job_id.as_str(), "result"])?;
        let response = self.client.get(url).send().await?;

        let result: ResultResponse = self.handle_response(response).await?;
        match result.into_url() {
            Some(url) => {
                let url = self.resolve_artifact_url(&url)?;
                Ok(Some(ArtifactRef::new(job_id.clone(), url)))
            }
            None => {
                debug!("No result url yet for job {}", job_id);
                Ok(None)
            }
        }
    }
}
