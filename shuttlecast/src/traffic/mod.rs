//! Live traffic lookup.
//!
//! A [`TrafficProvider`] answers "how long does this leg take right now, and
//! how long does it usually take?". Providers never fail: an outage or bad
//! response becomes [`TrafficOutcome::Degraded`], so callers can tell a
//! measured zero delay from missing data without handling errors.
//!
//! # Factory
//!
//! ```ignore
//! use shuttlecast::traffic::{provider_from_api_key, ReqwestClient};
//!
//! let provider = provider_from_api_key(Some("KEY".into()), 10)?;
//! ```

mod fixed;
mod google;
mod http;
mod types;

pub use fixed::{DisabledTrafficProvider, FixedTrafficProvider};
pub use google::{GoogleDirectionsProvider, DIRECTIONS_ENDPOINT};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{DepartureTime, TrafficError, TrafficOutcome, TrafficProvider, TrafficReading};

#[cfg(test)]
pub use http::tests::MockHttpClient;

/// Builds the provider matching the configuration.
///
/// With an API key this is the Google Directions provider using a reqwest
/// client with `timeout_secs`; without one, traffic lookups are disabled.
pub fn provider_from_api_key(
    api_key: Option<String>,
    timeout_secs: u64,
) -> Result<Box<dyn TrafficProvider>, TrafficError> {
    match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            let client = ReqwestClient::with_timeout(timeout_secs)?;
            tracing::info!(timeout_secs, "Using Google Directions for live traffic");
            Ok(Box::new(GoogleDirectionsProvider::new(client, key)))
        }
        None => {
            tracing::info!("No Google Maps API key configured, live traffic disabled");
            Ok(Box::new(DisabledTrafficProvider))
        }
    }
}
