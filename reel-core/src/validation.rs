//! Client-side validation of job submissions
//!
//! Submissions are checked before any request is built, so a rejected input
//! never reaches the network.

use thiserror::Error;

use crate::dto::job::CreateJob;

/// Frame count suggested to users when they do not pick one
pub const DEFAULT_FRAME_COUNT: u32 = 30;

/// Rejected user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("frame count '{0}' is not a whole number")]
    InvalidFrameCount(String),

    #[error("frame count must be positive, got {0}")]
    NonPositiveFrameCount(i64),
}

/// Validate raw user input and build the submission body
///
/// `frames` is taken as text since it comes straight from a form field or
/// command-line argument.
pub fn validate_submission(prompt: &str, frames: &str) -> Result<CreateJob, ValidationError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }

    let frames = parse_frame_count(frames)?;

    Ok(CreateJob {
        prompt: prompt.to_string(),
        frames,
    })
}

/// Parse a frame count, which must be a positive integer
pub fn parse_frame_count(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidFrameCount(trimmed.to_string()))?;

    if value <= 0 {
        return Err(ValidationError::NonPositiveFrameCount(value));
    }

    u32::try_from(value).map_err(|_| ValidationError::InvalidFrameCount(trimmed.to_string()))
}
