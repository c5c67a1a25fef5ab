//! Prediction output types.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Whether the traffic component was measured or missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficStatus {
    Measured,
    Degraded,
}

/// Component breakdown of a prediction.
///
/// Delay components are rounded to one decimal; `predicted_arrival` is exact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionDetails {
    pub traffic_delay: f64,
    pub route_baseline_delay: f64,
    pub heuristic_delay: f64,
    pub total_extra_delay: f64,
    pub predicted_arrival: NaiveDateTime,
}

/// Result of one delay prediction.
///
/// Serializes to JSON as:
///
/// ```text
/// {
///   "net_delay_minutes": 13.0,
///   "message": "Shuttle 13 minutes late.",
///   "on_time": false,
///   "traffic_status": "measured",
///   "details": {
///     "traffic_delay": 0.0,
///     "route_baseline_delay": 3.0,
///     "heuristic_delay": 10.0,
///     "total_extra_delay": 13.0,
///     "predicted_arrival": "2024-05-01T09:28:00"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Lateness in minutes, never negative, one decimal.
    pub net_delay_minutes: f64,
    pub message: String,
    pub on_time: bool,
    pub traffic_status: TrafficStatus,
    pub details: PredictionDetails,
}

/// Rounds to one decimal place.
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Status line for a net delay.
pub fn status_message(net_delay: f64, grace_minutes: f64) -> String {
    if net_delay <= grace_minutes {
        "Shuttle is on time.".to_string()
    } else {
        format!("Shuttle {} minutes late.", net_delay.round() as i64)
    }
}
