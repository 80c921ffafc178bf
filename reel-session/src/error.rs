//! Error types for session operations

use reel_client::ClientError;
use reel_core::ValidationError;
use thiserror::Error;

/// Why a submission did not go through
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Input was rejected before any request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend could not be reached or refused the job
    #[error("failed to submit job: {0}")]
    Transport(#[from] ClientError),
}
