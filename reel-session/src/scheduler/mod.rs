//! Scheduler layer
//!
//! The poller keeps the job list in sync with the backend on a fixed cadence;
//! the resolver turns completed jobs into resolved artifacts. Data only flows
//! one way: poller -> job list -> resolver -> artifacts.

pub mod poller;
pub mod resolver;

pub use poller::{JobPoller, RefreshOutcome};
pub use resolver::{ReconcilePass, ResultResolver};
