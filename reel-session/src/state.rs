//! Client-side job state
//!
//! [`StateStore`] owns the only copy of the client's view of the backend and
//! publishes it as immutable [`ClientState`] snapshots over a
//! `tokio::sync::watch` channel. Renderers subscribe and never write.
//!
//! Every mutation is a single `send_if_modified` call, so subscribers never
//! observe a half-applied update.

use chrono::{DateTime, Utc};
use reel_core::domain::artifact::ArtifactRef;
use reel_core::domain::job::{Job, JobId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of everything the client knows
///
/// Invariant: `artifacts` only holds entries for jobs present in `jobs` with
/// status `Completed`.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    /// Jobs in the order the backend last reported them
    pub jobs: Vec<Job>,

    /// Resolved artifacts keyed by job id
    pub artifacts: HashMap<JobId, ArtifactRef>,

    /// Sequence number of the job list response currently applied
    pub generation: u64,

    /// When the job list was last applied
    pub refreshed_at: Option<DateTime<Utc>>,

    /// Message of the most recent failed list fetch, cleared on success
    pub poll_error: Option<String>,
}

impl ClientState {
    pub fn job(&self, job_id: &JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| &j.id == job_id)
    }

    pub fn artifact(&self, job_id: &JobId) -> Option<&ArtifactRef> {
        self.artifacts.get(job_id)
    }

    /// Completed jobs that have no artifact yet
    pub fn unresolved(&self) -> impl Iterator<Item = &Job> {
        self.jobs
            .iter()
            .filter(|j| j.is_completed() && !self.artifacts.contains_key(&j.id))
    }
}

/// Shared handle to the published client state
#[derive(Debug, Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<ClientState>>,
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ClientState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.tx.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ClientState {
        self.tx.borrow().clone()
    }

    /// Replace the job list wholesale
    ///
    /// `seq` is the request-sequence token of the list fetch. A response older
    /// than the one already applied is dropped so a slow request can never
    /// overwrite a newer list.
    ///
    /// # Returns
    /// Whether the list was applied
    pub fn apply_jobs(&self, seq: u64, jobs: Vec<Job>) -> bool {
        self.tx.send_if_modified(|state| {
            if seq <= state.generation {
                return false;
            }

            let completed: HashSet<&JobId> = jobs
                .iter()
                .filter(|j| j.is_completed())
                .map(|j| &j.id)
                .collect();
            state.artifacts.retain(|id, _| completed.contains(id));

            state.jobs = jobs;
            state.generation = seq;
            state.refreshed_at = Some(Utc::now());
            state.poll_error = None;
            true
        })
    }

    /// Record a failed list fetch without touching the job list
    ///
    /// A failure of request `seq` is ignored once a newer list has been
    /// applied.
    pub fn record_poll_error(&self, seq: u64, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_if_modified(|state| {
            if seq < state.generation {
                return false;
            }
            if state.poll_error.as_deref() == Some(message.as_str()) {
                return false;
            }
            state.poll_error = Some(message);
            true
        });
    }

    /// Merge a resolved artifact
    ///
    /// Artifacts are immutable: an existing entry is never replaced. The merge
    /// is refused if the job is no longer listed as completed.
    ///
    /// # Returns
    /// Whether the artifact was inserted
    pub fn merge_artifact(&self, artifact: ArtifactRef) -> bool {
        self.tx.send_if_modified(|state| {
            if state.artifacts.contains_key(&artifact.job_id) {
                return false;
            }

            let completed = state
                .job(&artifact.job_id)
                .is_some_and(|job| job.is_completed());
            if !completed {
                return false;
            }

            state.artifacts.insert(artifact.job_id.clone(), artifact);
            true
        })
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
