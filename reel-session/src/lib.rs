//! Reel Session
//!
//! Client-side reconciliation of video-generation jobs.
//!
//! Architecture:
//! - State: [`StateStore`] publishes immutable [`ClientState`] snapshots
//! - Scheduler: [`JobPoller`] keeps the job list in sync on a fixed cadence,
//!   [`ResultResolver`] fetches each completed job's artifact exactly once
//! - Session: [`Session`] ties both to a polling timer with clean teardown
//!
//! Renderers subscribe to the store and never write to it.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::SubmitError;
pub use scheduler::{JobPoller, ReconcilePass, RefreshOutcome, ResultResolver};
pub use session::Session;
pub use state::{ClientState, StateStore};
