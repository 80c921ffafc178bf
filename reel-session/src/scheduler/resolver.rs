//! Artifact resolver
//!
//! Resolves the artifact of every completed job exactly once. A job id is
//! claimed in the in-flight set before its fetch is spawned and released only
//! after the outcome has been merged, so overlapping reconcile passes never
//! fetch the same job twice.

use reel_client::JobBackend;
use reel_core::domain::job::JobId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::state::{ClientState, StateStore};

type InFlightSet = Arc<Mutex<HashSet<JobId>>>;

/// Fetches and merges artifacts for completed jobs
pub struct ResultResolver {
    backend: Arc<dyn JobBackend>,
    store: StateStore,
    in_flight: InFlightSet,
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl ResultResolver {
    /// Creates a new resolver
    ///
    /// # Arguments
    /// * `backend` - Backend to fetch results from
    /// * `store` - Store that receives resolved artifacts
    /// * `max_concurrent_fetches` - Cap on simultaneous fetches
    /// * `shutdown` - Once cancelled, fetch outcomes are discarded
    pub fn new(
        backend: Arc<dyn JobBackend>,
        store: StateStore,
        max_concurrent_fetches: usize,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            backend,
            store,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            permits: Arc::new(Semaphore::new(max_concurrent_fetches)),
            shutdown,
        }
    }

    /// Runs one reconcile pass over a snapshot
    ///
    /// Starts a fetch for every completed job that has no artifact and no
    /// fetch in flight. Fetches run concurrently and are not awaited here.
    /// Jobs skipped because the concurrency cap is reached are picked up by a
    /// later pass.
    pub fn reconcile(&self, state: &ClientState) -> ReconcilePass {
        let mut pass = ReconcilePass::default();

        for job in state.unresolved() {
            let Some(claim) = InFlightClaim::acquire(&self.in_flight, &job.id) else {
                debug!("Result fetch for job {} already in flight", job.id);
                continue;
            };

            let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
                debug!("Max concurrent fetches reached, deferring job {}", job.id);
                continue;
            };

            pass.started.push(job.id.clone());
            pass.handles.push(self.spawn_fetch(claim, permit));
        }

        if !pass.started.is_empty() {
            debug!("Started {} result fetch(es)", pass.started.len());
        }

        pass
    }

    /// Number of fetches currently in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn spawn_fetch(&self, claim: InFlightClaim, permit: OwnedSemaphorePermit) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let store = self.store.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let job_id = claim.job_id.clone();
            let outcome = backend.fetch_result(&job_id).await;

            if shutdown.is_cancelled() {
                debug!("Session ended, discarding result of job {}", job_id);
                return;
            }

            match outcome {
                Ok(Some(artifact)) => {
                    let url = artifact.url.clone();
                    if store.merge_artifact(artifact) {
                        info!("Resolved artifact for job {}: {}", job_id, url);
                    } else {
                        debug!("Artifact for job {} no longer applicable", job_id);
                    }
                }
                Ok(None) => debug!("Result of job {} not ready yet", job_id),
                Err(e) if e.is_not_found() => {
                    debug!("Result of job {} not found yet, will retry", job_id)
                }
                Err(e) => warn!("Failed to fetch result of job {}: {}", job_id, e),
            }

            // Released only after the merge above
            drop(permit);
            drop(claim);
        })
    }
}

/// Fetches started by one reconcile pass
#[derive(Debug, Default)]
pub struct ReconcilePass {
    started: Vec<JobId>,
    handles: Vec<JoinHandle<()>>,
}

impl ReconcilePass {
    /// Job ids whose fetch this pass started
    pub fn started(&self) -> &[JobId] {
        &self.started
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_empty()
    }

    /// Waits until every fetch of this pass has settled
    pub async fn settled(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!("Result fetch task panicked: {}", e);
            }
        }
    }
}

/// Membership of one job id in the in-flight set, released on drop
struct InFlightClaim {
    set: InFlightSet,
    job_id: JobId,
}

impl InFlightClaim {
    /// Check-and-insert under one lock; `None` if the id is already claimed
    fn acquire(set: &InFlightSet, job_id: &JobId) -> Option<Self> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.clone());

        inserted.then(|| Self {
            set: Arc::clone(set),
            job_id: job_id.clone(),
        })
    }
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.job_id);
    }
}
