//! Watch session
//!
//! A session owns the client state for as long as a user watches their jobs:
//! it starts the polling loop, exposes submit/refresh, and hands out
//! subscriptions to renderers. Dropping out of the session cancels the timer;
//! requests already in flight finish and their results are discarded.

use reel_client::{ClientError, JobBackend};
use reel_core::domain::job::JobId;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::SubmitError;
use crate::scheduler::{JobPoller, RefreshOutcome};
use crate::state::ClientState;

/// Running watch session
pub struct Session {
    poller: Arc<JobPoller>,
    shutdown: CancellationToken,
    timer: JoinHandle<()>,
}

impl Session {
    /// Starts a session and its polling loop
    ///
    /// The job list is refreshed immediately, then every `poll_interval`.
    pub fn start(config: &Config, backend: Arc<dyn JobBackend>) -> Self {
        let shutdown = CancellationToken::new();
        let poller = Arc::new(JobPoller::from_config(config, backend, shutdown.clone()));

        let timer = {
            let poller = Arc::clone(&poller);
            tokio::spawn(async move { poller.run().await })
        };

        info!("Session started against {}", config.backend_url);

        Self {
            poller,
            shutdown,
            timer,
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.poller.store().subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ClientState {
        self.poller.store().snapshot()
    }

    /// Submit a job; see [`JobPoller::submit`]
    pub async fn submit(&self, prompt: &str, frames: &str) -> Result<Option<JobId>, SubmitError> {
        self.poller.submit(prompt, frames).await
    }

    /// Refresh outside the timer cadence
    pub async fn refresh(&self) -> Result<RefreshOutcome, ClientError> {
        self.poller.refresh().await
    }

    /// Ends the session
    ///
    /// Cancels the polling timer and waits for the loop to exit.
    pub async fn shutdown(self) {
        self.shutdown.cancel();

        if let Err(e) = self.timer.await {
            warn!("Poller task panicked: {}", e);
        }

        info!("Session ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, job};
    use reel_core::domain::job::JobStatus;
    use std::time::Duration;

    fn start(backend: &Arc<FakeBackend>) -> Session {
        let config = Config::default().with_poll_interval(Duration::from_secs(5));
        Session::start(&config, Arc::clone(backend) as Arc<dyn JobBackend>)
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_on_start_then_every_interval() {
        let backend = Arc::new(FakeBackend::new());
        let session = start(&backend);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(backend.list_calls(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.list_calls(), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(backend.list_calls(), 4);

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_polling() {
        let backend = Arc::new(FakeBackend::new());
        let session = start(&backend);

        tokio::time::sleep(Duration::from_millis(100)).await;
        session.shutdown().await;
        let calls = backend.list_calls();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.list_calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_does_not_wait_for_slow_list() {
        let backend = Arc::new(FakeBackend::new());
        backend.push_list_after(
            Ok(vec![job("1", JobStatus::Pending)]),
            Duration::from_secs(60),
        );
        let session = start(&backend);
        let rx = session.subscribe();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(backend.list_calls(), 1);

        let begin = tokio::time::Instant::now();
        session.shutdown().await;

        assert!(begin.elapsed() < Duration::from_secs(1));
        assert!(rx.borrow().jobs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_refresh_between_ticks() {
        let backend = Arc::new(FakeBackend::new());
        let session = start(&backend);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(session.snapshot().jobs.is_empty());

        backend.set_jobs(vec![job("1", JobStatus::Running)]);
        let outcome = session.refresh().await.unwrap();

        assert!(matches!(outcome, RefreshOutcome::Applied { jobs: 1, .. }));
        assert_eq!(session.snapshot().jobs[0].status, JobStatus::Running);
        assert_eq!(backend.list_calls(), 2);

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_completed_job_resolve() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_jobs(vec![job("1", JobStatus::Running)]);
        let session = start(&backend);
        let mut rx = session.subscribe();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.borrow_and_update().artifacts.is_empty());

        backend.set_jobs(vec![job("1", JobStatus::Completed)]);
        tokio::time::sleep(Duration::from_secs(5)).await;

        let state = rx.borrow_and_update().clone();
        assert_eq!(state.jobs[0].status, JobStatus::Completed);
        assert_eq!(
            state.artifact(&"1".into()).unwrap().url,
            FakeBackend::artifact_url("1")
        );
        assert_eq!(backend.result_calls("1"), 1);

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_through_session() {
        let backend = Arc::new(FakeBackend::new());
        let session = start(&backend);
        tokio::time::sleep(Duration::from_millis(100)).await;

        session.submit("waves at dusk", "30").await.unwrap();
        assert_eq!(session.snapshot().jobs.len(), 1);

        session.shutdown().await;
    }
}
