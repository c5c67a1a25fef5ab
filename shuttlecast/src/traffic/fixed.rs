//! Providers that answer without a network call.

use crate::coord::GeoPoint;
use crate::traffic::{DepartureTime, TrafficError, TrafficOutcome, TrafficProvider, TrafficReading};

/// Used when no API key is configured: every lookup is degraded.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTrafficProvider;

impl TrafficProvider for DisabledTrafficProvider {
    fn traffic_delay(
        &self,
        _origin: GeoPoint,
        _destination: GeoPoint,
        _departure: DepartureTime,
    ) -> TrafficOutcome {
        TrafficOutcome::Degraded {
            reason: TrafficError::Disabled,
        }
    }

    fn name(&self) -> &str {
        "Disabled"
    }
}

/// Returns the same outcome for every leg.
///
/// Useful for demos and for pinning traffic in tests.
#[derive(Debug, Clone)]
pub struct FixedTrafficProvider {
    outcome: TrafficOutcome,
}

impl FixedTrafficProvider {
    /// Always measured, with the given live and typical minutes.
    pub fn measured(live_time: f64, baseline_time: f64) -> Self {
        Self {
            outcome: TrafficOutcome::Measured(TrafficReading::from_times(live_time, baseline_time)),
        }
    }

    /// Always degraded with `reason`.
    pub fn degraded(reason: TrafficError) -> Self {
        Self {
            outcome: TrafficOutcome::Degraded { reason },
        }
    }
}

impl TrafficProvider for FixedTrafficProvider {
    fn traffic_delay(
        &self,
        _origin: GeoPoint,
        _destination: GeoPoint,
        _departure: DepartureTime,
    ) -> TrafficOutcome {
        self.outcome.clone()
    }

    fn name(&self) -> &str {
        "Fixed"
    }
}
