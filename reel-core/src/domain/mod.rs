//! Core domain types
//!
//! These types represent what the client knows about the backend: the jobs it
//! reports and the artifacts resolved for completed jobs. The backend is the
//! only writer of job state; the client merely observes it.

pub mod artifact;
pub mod job;
