//! Traffic provider trait and result types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::coord::GeoPoint;

/// Errors raised inside a traffic provider.
///
/// These never leave a [`TrafficProvider`]: they are folded into
/// [`TrafficOutcome::Degraded`] so a predictor keeps working through an
/// outage. Adapters use them internally and for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrafficError {
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Directions API status {status}: {message}")]
    ApiStatus { status: String, message: String },

    #[error("No route found between origin and destination")]
    NoRoute,

    #[error("Traffic lookups are disabled (no API key configured)")]
    Disabled,
}

/// When the vehicle leaves `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepartureTime {
    #[default]
    Now,
    At(DateTime<Utc>),
}

impl DepartureTime {
    /// Value for the Directions API `departure_time` parameter.
    pub fn as_query_value(&self) -> String {
        match self {
            DepartureTime::Now => "now".to_string(),
            DepartureTime::At(t) => t.timestamp().to_string(),
        }
    }
}

/// Travel times for one leg, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrafficReading {
    /// Travel time under current traffic.
    pub live_time: f64,
    /// Typical travel time without traffic.
    pub baseline_time: f64,
    /// `max(0, live_time - baseline_time)`.
    pub traffic_delay: f64,
}

impl TrafficReading {
    /// Builds a reading from live and baseline minutes, deriving the delay.
    pub fn from_times(live_time: f64, baseline_time: f64) -> Self {
        Self {
            live_time,
            baseline_time,
            traffic_delay: (live_time - baseline_time).max(0.0),
        }
    }

    /// The all-zero reading reported when no data is available.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Result of a traffic lookup.
///
/// `Measured` with a zero delay means the road is clear; `Degraded` means
/// the provider could not answer and the zero values carry no information.
#[derive(Debug, Clone, PartialEq)]
pub enum TrafficOutcome {
    Measured(TrafficReading),
    Degraded { reason: TrafficError },
}

impl TrafficOutcome {
    /// Traffic values, all zero for a degraded outcome.
    pub fn reading(&self) -> TrafficReading {
        match self {
            TrafficOutcome::Measured(reading) => *reading,
            TrafficOutcome::Degraded { .. } => TrafficReading::zero(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, TrafficOutcome::Degraded { .. })
    }
}

impl From<Result<TrafficReading, TrafficError>> for TrafficOutcome {
    fn from(result: Result<TrafficReading, TrafficError>) -> Self {
        match result {
            Ok(reading) => TrafficOutcome::Measured(reading),
            Err(reason) => TrafficOutcome::Degraded { reason },
        }
    }
}

/// Source of live travel times between two points.
///
/// Implementations must not fail or panic: any internal error becomes
/// [`TrafficOutcome::Degraded`].
pub trait TrafficProvider: Send + Sync {
    /// Live vs. typical travel time from `origin` to `destination`.
    fn traffic_delay(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        departure: DepartureTime,
    ) -> TrafficOutcome;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

impl<P: TrafficProvider + ?Sized> TrafficProvider for Box<P> {
    fn traffic_delay(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        departure: DepartureTime,
    ) -> TrafficOutcome {
        (**self).traffic_delay(origin, destination, departure)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: TrafficProvider + ?Sized> TrafficProvider for std::sync::Arc<P> {
    fn traffic_delay(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        departure: DepartureTime,
    ) -> TrafficOutcome {
        (**self).traffic_delay(origin, destination, departure)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reading_delay_never_negative() {
        let reading = TrafficReading::from_times(10.0, 12.0);
        assert_eq!(reading.traffic_delay, 0.0);

        let reading = TrafficReading::from_times(15.5, 12.0);
        assert_eq!(reading.traffic_delay, 3.5);
    }

    #[test]
    fn test_degraded_outcome_is_zero() {
        let outcome = TrafficOutcome::Degraded {
            reason: TrafficError::NoRoute,
        };
        assert!(outcome.is_degraded());
        assert_eq!(outcome.reading(), TrafficReading::zero());
        assert_eq!(outcome.reading().baseline_time, 0.0);
    }

    #[test]
    fn test_measured_zero_distinct_from_degraded() {
        let measured = TrafficOutcome::Measured(TrafficReading::zero());
        assert!(!measured.is_degraded());
        assert_eq!(measured.reading(), TrafficReading::zero());
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: TrafficOutcome = Ok(TrafficReading::from_times(5.0, 4.0)).into();
        assert_eq!(ok.reading().traffic_delay, 1.0);

        let err: TrafficOutcome = Err(TrafficError::HttpError("timeout".into())).into();
        assert!(err.is_degraded());
    }

    #[test]
    fn test_departure_query_value() {
        assert_eq!(DepartureTime::Now.as_query_value(), "now");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(DepartureTime::At(at).as_query_value(), "1714550400");
    }
}
