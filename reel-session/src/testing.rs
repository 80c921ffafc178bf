//! Scripted backend used by the unit tests of this crate

use async_trait::async_trait;
use reel_client::{ClientError, JobBackend};
use reel_core::domain::artifact::ArtifactRef;
use reel_core::domain::job::{Job, JobId, JobStatus};
use reel_core::dto::job::CreateJob;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;

pub fn job(id: &str, status: JobStatus) -> Job {
    Job {
        id: JobId::new(id),
        prompt: format!("prompt {}", id),
        frame_count: Some(30),
        status,
        failure_detail: None,
    }
}

/// Scripted answer of the result endpoint
#[derive(Debug, Clone)]
pub enum ResultScript {
    Ready,
    NotReady,
    Fail(u16),
}

/// In-memory backend with scripted responses and call counters
///
/// The job list is `current` unless a scripted response is queued. Scripted
/// list responses can be delayed to keep a request in flight. Result
/// fetches answer `Ready` unless scripted otherwise, and can be held back
/// behind a gate to keep them in flight.
#[derive(Default)]
pub struct FakeBackend {
    current: Mutex<Vec<Job>>,
    list_script: Mutex<VecDeque<(Result<Vec<Job>, u16>, Duration)>>,
    submit_failure: Mutex<Option<u16>>,
    result_script: Mutex<HashMap<JobId, VecDeque<ResultScript>>>,
    gate: Option<Semaphore>,
    list_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    result_calls: Mutex<HashMap<JobId, usize>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result fetches wait until [`FakeBackend::release`] lets them through
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn set_jobs(&self, jobs: Vec<Job>) {
        *self.current.lock().unwrap() = jobs;
    }

    pub fn push_list(&self, response: Result<Vec<Job>, u16>) {
        self.push_list_after(response, Duration::ZERO);
    }

    /// Queue a list response that is only answered after `delay`
    pub fn push_list_after(&self, response: Result<Vec<Job>, u16>, delay: Duration) {
        self.list_script
            .lock()
            .unwrap()
            .push_back((response, delay));
    }

    pub fn fail_submits(&self, status: u16) {
        *self.submit_failure.lock().unwrap() = Some(status);
    }

    pub fn script_result(&self, id: &str, script: ResultScript) {
        self.result_script
            .lock()
            .unwrap()
            .entry(JobId::new(id))
            .or_default()
            .push_back(script);
    }

    pub fn release(&self, fetches: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(fetches);
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn result_calls(&self, id: &str) -> usize {
        self.result_calls
            .lock()
            .unwrap()
            .get(&JobId::new(id))
            .copied()
            .unwrap_or(0)
    }

    pub fn artifact_url(id: &str) -> String {
        format!("http://backend/static/{}.mp4", id)
    }
}

#[async_trait]
impl JobBackend for FakeBackend {
    async fn list_jobs(&self) -> reel_client::Result<Vec<Job>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        // Popped before sleeping so concurrent calls take responses in call order
        let scripted = self.list_script.lock().unwrap().pop_front();
        let scripted = match scripted {
            Some((response, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Some(response)
            }
            None => None,
        };

        match scripted {
            Some(Ok(jobs)) => {
                *self.current.lock().unwrap() = jobs.clone();
                Ok(jobs)
            }
            Some(Err(status)) => Err(ClientError::api_error(status, "scripted failure")),
            None => Ok(self.current.lock().unwrap().clone()),
        }
    }

    async fn submit_job(&self, req: &CreateJob) -> reel_client::Result<Option<JobId>> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = *self.submit_failure.lock().unwrap() {
            return Err(ClientError::api_error(status, "scripted failure"));
        }

        let id = JobId::new(format!("job-{}", self.submit_calls()));
        let mut submitted = job(id.as_str(), JobStatus::Pending);
        submitted.prompt = req.prompt.clone();
        submitted.frame_count = Some(req.frames);
        self.current.lock().unwrap().push(submitted);

        Ok(Some(id))
    }

    async fn fetch_result(&self, job_id: &JobId) -> reel_client::Result<Option<ArtifactRef>> {
        *self
            .result_calls
            .lock()
            .unwrap()
            .entry(job_id.clone())
            .or_default() += 1;

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let script = self
            .result_script
            .lock()
            .unwrap()
            .get_mut(job_id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(ResultScript::Ready);

        match script {
            ResultScript::Ready => Ok(Some(ArtifactRef::new(
                job_id.clone(),
                Self::artifact_url(job_id.as_str()),
            ))),
            ResultScript::NotReady => Ok(None),
            ResultScript::Fail(status) => Err(ClientError::api_error(status, "scripted failure")),
        }
    }
}
