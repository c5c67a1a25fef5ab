//! Google Maps Directions traffic provider.
//!
//! Uses the Directions API with an API key to compare the typical driving
//! time of a leg against the time under current traffic.
//!
//! # API Endpoint
//!
//! `https://maps.googleapis.com/maps/api/directions/json?origin={lat,lon}&destination={lat,lon}&mode=driving&departure_time={now|unix}&key={API_KEY}`
//!
//! The first leg of the first route carries:
//! - `duration.value`: typical travel time in seconds
//! - `duration_in_traffic.value`: travel time under current traffic, only
//!   present when `departure_time` is set and traffic data exists
//!
//! When `duration_in_traffic` is missing the live time equals the typical
//! time, so the traffic delay is zero but the reading still counts as
//! measured.

use serde::Deserialize;

use crate::coord::GeoPoint;
use crate::traffic::{
    DepartureTime, HttpClient, TrafficError, TrafficOutcome, TrafficProvider, TrafficReading,
};

/// Production Directions API endpoint.
pub const DIRECTIONS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/directions/json";

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    duration: Duration,
    #[serde(default)]
    duration_in_traffic: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct Duration {
    /// Seconds.
    value: f64,
}

/// Google Maps Directions traffic provider.
///
/// Requires a Google Maps Platform API key with the Directions API enabled.
/// Every failure (network, quota, malformed body, no route) is reported as a
/// degraded outcome and logged at `warn`.
///
/// # Example
///
/// ```no_run
/// use shuttlecast::coord::GeoPoint;
/// use shuttlecast::traffic::{DepartureTime, GoogleDirectionsProvider, ReqwestClient, TrafficProvider};
///
/// let client = ReqwestClient::new().unwrap();
/// let provider = GoogleDirectionsProvider::new(client, "YOUR_API_KEY".to_string());
/// let origin = GeoPoint::new(40.9904, 29.0201).unwrap();
/// let destination = GeoPoint::new(41.0884, 29.0441).unwrap();
/// let outcome = provider.traffic_delay(origin, destination, DepartureTime::Now);
/// println!("traffic delay: {:.1} min", outcome.reading().traffic_delay);
/// ```
pub struct GoogleDirectionsProvider<C: HttpClient> {
    http_client: C,
    api_key: String,
    endpoint: String,
}

impl<C: HttpClient> GoogleDirectionsProvider<C> {
    /// Creates a provider against the production endpoint.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `api_key` - Valid Google Maps Platform API key
    pub fn new(http_client: C, api_key: String) -> Self {
        Self::with_endpoint(http_client, api_key, DIRECTIONS_ENDPOINT)
    }

    /// Creates a provider against a custom endpoint (proxies, test servers).
    pub fn with_endpoint(http_client: C, api_key: String, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key,
            endpoint: endpoint.into(),
        }
    }

    fn build_url(&self, origin: GeoPoint, destination: GeoPoint, departure: DepartureTime) -> String {
        format!(
            "{}?origin={}&destination={}&mode=driving&departure_time={}&key={}",
            self.endpoint,
            origin,
            destination,
            departure.as_query_value(),
            self.api_key
        )
    }

    fn fetch(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        departure: DepartureTime,
    ) -> Result<TrafficReading, TrafficError> {
        let url = self.build_url(origin, destination, departure);
        let body = self.http_client.get(&url)?;
        parse_directions(&body)
    }
}

/// Extracts live and typical minutes from a Directions API response body.
fn parse_directions(body: &[u8]) -> Result<TrafficReading, TrafficError> {
    let response: DirectionsResponse = serde_json::from_slice(body)
        .map_err(|e| TrafficError::InvalidResponse(e.to_string()))?;

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(TrafficError::NoRoute),
        _ => {
            return Err(TrafficError::ApiStatus {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            })
        }
    }

    let leg = response
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next())
        .ok_or(TrafficError::NoRoute)?;

    let baseline_secs = leg.duration.value;
    let live_secs = leg
        .duration_in_traffic
        .map(|d| d.value)
        .unwrap_or(baseline_secs);

    if !baseline_secs.is_finite() || !live_secs.is_finite() || baseline_secs < 0.0 || live_secs < 0.0
    {
        return Err(TrafficError::InvalidResponse(format!(
            "invalid durations: {} / {}",
            baseline_secs, live_secs
        )));
    }

    Ok(TrafficReading::from_times(live_secs / 60.0, baseline_secs / 60.0))
}

impl<C: HttpClient> TrafficProvider for GoogleDirectionsProvider<C> {
    fn traffic_delay(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        departure: DepartureTime,
    ) -> TrafficOutcome {
        match self.fetch(origin, destination, departure) {
            Ok(reading) => {
                tracing::debug!(
                    live_min = reading.live_time,
                    baseline_min = reading.baseline_time,
                    delay_min = reading.traffic_delay,
                    "Directions API traffic reading"
                );
                TrafficOutcome::Measured(reading)
            }
            Err(reason) => {
                tracing::warn!(error = %reason, "Traffic lookup failed, continuing without traffic data");
                TrafficOutcome::Degraded { reason }
            }
        }
    }

    fn name(&self) -> &str {
        "Google Maps Directions"
    }
}
