//! Job poller
//!
//! Refreshes the job list immediately and then on every tick of a fixed
//! interval, and submits new jobs. Each successful refresh runs a reconcile
//! pass so newly completed jobs get their artifacts resolved.

use reel_client::{ClientError, JobBackend};
use reel_core::domain::job::JobId;
use reel_core::validation::validate_submission;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SubmitError;
use crate::scheduler::resolver::{ReconcilePass, ResultResolver};
use crate::state::StateStore;

/// What a refresh did with the list it fetched
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The list was applied and a reconcile pass started
    Applied { jobs: usize, pass: ReconcilePass },
    /// A newer list was applied while this one was in flight
    Stale,
    /// The session ended while the request was in flight
    Discarded,
}

/// Job poller that keeps the client state in sync with the backend
pub struct JobPoller {
    backend: Arc<dyn JobBackend>,
    store: StateStore,
    resolver: ResultResolver,
    poll_interval: Duration,
    shutdown: CancellationToken,
    next_seq: AtomicU64,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(
        backend: Arc<dyn JobBackend>,
        store: StateStore,
        resolver: ResultResolver,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            backend,
            store,
            resolver,
            poll_interval,
            shutdown,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Creates a poller with a fresh store and resolver
    pub fn from_config(
        config: &Config,
        backend: Arc<dyn JobBackend>,
        shutdown: CancellationToken,
    ) -> Self {
        let store = StateStore::new();
        let resolver = ResultResolver::new(
            Arc::clone(&backend),
            store.clone(),
            config.max_concurrent_fetches,
            shutdown.clone(),
        );
        Self::new(backend, store, resolver, config.poll_interval, shutdown)
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Starts the polling loop
    ///
    /// The first tick fires immediately. Each tick's refresh is awaited before
    /// the next tick and missed ticks are skipped, so timer refreshes never
    /// overlap. Returns as soon as the shutdown token is cancelled, dropping
    /// a refresh that is still waiting on the backend.
    pub async fn run(&self) {
        info!(
            "Starting job poller (interval: {:?})",
            self.poll_interval
        );

        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            debug!("Polling job list");

            let outcome = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                outcome = self.refresh() => outcome,
            };

            // Failures are logged by refresh; the next tick is the retry
            if let Ok(RefreshOutcome::Applied { jobs, pass }) = outcome {
                if !pass.is_empty() {
                    info!(
                        "{} job(s) listed, resolving {} new result(s)",
                        jobs,
                        pass.started().len()
                    );
                }
            }
        }

        info!("Job poller stopped");
    }

    /// Fetches the job list and replaces the local one wholesale
    ///
    /// On failure the current list is left untouched and the error is
    /// recorded on the state for display.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ClientError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let jobs = match self.backend.list_jobs().await {
            Ok(jobs) => jobs,
            Err(e) => {
                if e.is_timeout() {
                    warn!("Job list request #{} timed out", seq);
                } else {
                    warn!("Failed to fetch job list: {}", e);
                }
                if !self.shutdown.is_cancelled() {
                    self.store.record_poll_error(seq, e.to_string());
                }
                return Err(e);
            }
        };

        if self.shutdown.is_cancelled() {
            debug!("Session ended, discarding job list #{}", seq);
            return Ok(RefreshOutcome::Discarded);
        }

        let count = jobs.len();
        if !self.store.apply_jobs(seq, jobs) {
            debug!("Discarding stale job list #{}", seq);
            return Ok(RefreshOutcome::Stale);
        }

        let pass = self.resolver.reconcile(&self.store.snapshot());
        Ok(RefreshOutcome::Applied { jobs: count, pass })
    }

    /// Validates and submits a new job, then refreshes right away
    ///
    /// Invalid input is rejected before any request is made. A failed
    /// submission leaves the job list untouched.
    ///
    /// # Arguments
    /// * `prompt` - Text prompt, must not be empty
    /// * `frames` - Frame count as typed by the user, must be a positive integer
    ///
    /// # Returns
    /// The new job id, when the backend reports it
    pub async fn submit(&self, prompt: &str, frames: &str) -> Result<Option<JobId>, SubmitError> {
        let req = validate_submission(prompt, frames)?;

        let job_id = self.backend.submit_job(&req).await.map_err(|e| {
            warn!("Failed to submit job: {}", e);
            e
        })?;

        match &job_id {
            Some(id) => info!("Submitted job {} ({} frames)", id, req.frames),
            None => info!("Submitted job ({} frames)", req.frames),
        }

        // A failed refresh here is already logged and retried by the timer
        let _ = self.refresh().await;

        Ok(job_id)
    }
}
