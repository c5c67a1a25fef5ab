//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::TrafficError;

/// Default request timeout for traffic lookups, in seconds.
///
/// A prediction blocks on this call, so it is kept short; a timeout only
/// degrades the estimate.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, TrafficError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, TrafficError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, TrafficError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("shuttlecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TrafficError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, TrafficError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TrafficError::HttpError(format!("Request failed: {}", e)))?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(TrafficError::HttpError(format!(
                "HTTP {} from Directions API",
                response.status()
            )));
        }

        // Read response body
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| TrafficError::HttpError(format!("Failed to read response: {}", e)))
    }
}
