//! Reel HTTP Client
//!
//! A small, typed HTTP client for the video-generation backend.
//!
//! The backend exposes three endpoints: list jobs, submit a job and fetch the
//! result of a job. [`BackendClient`] wraps them, and the [`JobBackend`] trait
//! is the seam the reconciliation core is written against so it can be driven
//! by a fake in tests.
//!
//! # Example
//!
//! ```no_run
//! use reel_client::BackendClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), reel_client::ClientError> {
//!     let client = BackendClient::new("http://localhost:8000");
//!
//!     for job in client.list_jobs().await? {
//!         println!("{} {}", job.id, job.status);
//!     }
//!     Ok(())
//! }
//! ```

mod backend;
pub mod error;
mod jobs;

// Re-export commonly used types
pub use backend::JobBackend;
pub use error::{ClientError, Result};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the video-generation backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client with a default HTTP client
    ///
    /// # Example
    /// ```
    /// use reel_client::BackendClient;
    ///
    /// let client = BackendClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This is how request timeouts are applied.
    ///
    /// # Example
    /// ```
    /// use reel_client::BackendClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = BackendClient::with_client("http://localhost:8000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint url from path segments
    ///
    /// Each segment is percent-encoded on its own, so opaque job ids cannot
    /// escape their path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.parsed_base()?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Turn an artifact url reported by the backend into an absolute url
    ///
    /// The backend reports results as server-relative paths such as
    /// `/static/<id>.mp4`; those are joined onto the base url.
    pub fn resolve_artifact_url(&self, url: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(url) {
            return Ok(absolute.to_string());
        }

        self.parsed_base()?
            .join(url)
            .map(|u| u.to_string())
            .map_err(|e| ClientError::InvalidRequest(format!("invalid artifact url '{}': {}", url, e)))
    }

    fn parsed_base(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid base url '{}': {}", self.base_url, e))
        })
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = self.check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Turn a non-2xx response into an [`ClientError::ApiError`]
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}
