//! Arrival delay prediction.
//!
//! Combines three independent delay sources for a shuttle on its way to the
//! next stop:
//!
//! ```text
//!   TrafficProvider ──► traffic delay ──────┐
//!   RouteBaselineStore ─► structural delay ─┼─► total extra delay
//!   HeuristicPolicy ──► time/crowding delay ┘          │
//!                                                     ▼
//!   typical travel time + total extra delay = predicted travel time
//!   net delay = max(0, predicted travel time - time remaining on schedule)
//! ```
//!
//! The typical travel time is the provider's baseline. A degraded provider
//! reports every travel time as zero, so the prediction then rests on the
//! extra delay alone, reconciled against the time remaining.
//!
//! A prediction is a pure function of its request, the provider answer and
//! the baseline store contents, so a [`DelayPredictor`] can be shared across
//! threads and called concurrently.

mod prediction;
mod request;

pub use prediction::{round1, status_message, Prediction, PredictionDetails, TrafficStatus};
pub use request::{PredictionError, PredictionRequest};

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta, Timelike};

use crate::baseline::RouteBaselineStore;
use crate::coord::GeoPoint;
use crate::heuristic::HeuristicPolicy;
use crate::model::RouteId;
use crate::traffic::{DepartureTime, TrafficOutcome, TrafficProvider};

/// Net delays up to this many minutes are reported as on time.
pub const DEFAULT_GRACE_MINUTES: f64 = 1.0;

/// Tunables for the predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorConfig {
    /// Time band and crowding policy.
    pub heuristic: HeuristicPolicy,

    /// Grace band in minutes.
    pub grace_minutes: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            heuristic: HeuristicPolicy::default(),
            grace_minutes: DEFAULT_GRACE_MINUTES,
        }
    }
}

impl PredictorConfig {
    /// Set the heuristic policy.
    pub fn with_heuristic(mut self, heuristic: HeuristicPolicy) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Set the grace band; negative values are treated as zero.
    pub fn with_grace_minutes(mut self, grace_minutes: f64) -> Self {
        self.grace_minutes = grace_minutes.max(0.0);
        self
    }
}

/// Delay predictor over a traffic provider and a baseline store.
pub struct DelayPredictor<P: TrafficProvider> {
    provider: P,
    baselines: Arc<RouteBaselineStore>,
    config: PredictorConfig,
}

impl<P: TrafficProvider> DelayPredictor<P> {
    /// Creates a predictor with the default heuristic and grace band.
    pub fn new(provider: P, baselines: Arc<RouteBaselineStore>) -> Self {
        Self::with_config(provider, baselines, PredictorConfig::default())
    }

    pub fn with_config(provider: P, baselines: Arc<RouteBaselineStore>, config: PredictorConfig) -> Self {
        Self {
            provider,
            baselines,
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn baselines(&self) -> &Arc<RouteBaselineStore> {
        &self.baselines
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Predicts the delay for the given positional inputs.
    ///
    /// `scheduled_arrival` may already be in the past; the prediction then
    /// reflects how late the shuttle already is plus the extra delay.
    pub fn predict_delay(
        &self,
        current_time: NaiveDateTime,
        scheduled_arrival: NaiveDateTime,
        current_location: GeoPoint,
        next_stop_location: GeoPoint,
        route_id: RouteId,
        passenger_count: u32,
    ) -> Prediction {
        self.predict(&PredictionRequest::new(
            current_time,
            scheduled_arrival,
            current_location,
            next_stop_location,
            route_id,
            passenger_count,
        ))
    }

    /// Predicts the delay for a validated request.
    pub fn predict(&self, request: &PredictionRequest) -> Prediction {
        // 1. Live traffic
        let outcome = self.provider.traffic_delay(
            request.current_location,
            request.next_stop_location,
            DepartureTime::Now,
        );
        let traffic_delay = outcome.reading().traffic_delay;

        // 2. Structural baseline for the route
        let route_baseline = self.baselines.get_baseline(request.route_id);

        // 3. Time of day and crowding
        let heuristic_delay = self
            .config
            .heuristic
            .delay_minutes(request.current_time.hour(), request.passenger_count);

        let total_extra_delay = traffic_delay + route_baseline + heuristic_delay;

        // 4. Reconcile against the schedule
        let time_remaining = request.time_remaining_minutes();
        let typical_travel_time = outcome.reading().baseline_time;
        let predicted_travel_time = typical_travel_time + total_extra_delay;
        let net_delay = (predicted_travel_time - time_remaining).max(0.0);
        let predicted_arrival = add_minutes(request.current_time, predicted_travel_time);

        let on_time = net_delay <= self.config.grace_minutes;
        let message = status_message(net_delay, self.config.grace_minutes);

        tracing::debug!(
            route = %request.route_id,
            traffic_delay,
            route_baseline,
            heuristic_delay,
            time_remaining,
            net_delay,
            degraded = outcome.is_degraded(),
            "Predicted shuttle delay"
        );

        Prediction {
            net_delay_minutes: round1(net_delay),
            message,
            on_time,
            traffic_status: match outcome {
                TrafficOutcome::Measured(_) => TrafficStatus::Measured,
                TrafficOutcome::Degraded { .. } => TrafficStatus::Degraded,
            },
            details: PredictionDetails {
                traffic_delay: round1(traffic_delay),
                route_baseline_delay: round1(route_baseline),
                heuristic_delay: round1(heuristic_delay),
                total_extra_delay: round1(total_extra_delay),
                predicted_arrival,
            },
        }
    }
}

/// `time + minutes`, saturating at the representable range.
fn add_minutes(time: NaiveDateTime, minutes: f64) -> NaiveDateTime {
    let millis = (minutes * 60_000.0).round();
    let shifted = if millis.is_finite() {
        TimeDelta::try_milliseconds(millis as i64).and_then(|d| time.checked_add_signed(d))
    } else {
        None
    };
    shifted.unwrap_or(if minutes < 0.0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::{DisabledTrafficProvider, FixedTrafficProvider, TrafficError};
    use chrono::{Duration, NaiveDate};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn here() -> GeoPoint {
        GeoPoint::new(41.0394, 29.0321).unwrap()
    }

    fn ank() -> GeoPoint {
        GeoPoint::new(41.0884, 29.0441).unwrap()
    }

    fn empty_store() -> Arc<RouteBaselineStore> {
        Arc::new(RouteBaselineStore::new())
    }

    #[test]
    fn test_peak_hour_degraded_unknown_route() {
        let predictor = DelayPredictor::new(DisabledTrafficProvider, empty_store());
        let now = at(9, 0);

        let p = predictor.predict_delay(now, now + Duration::minutes(15), here(), ank(), RouteId(999), 40);

        assert_eq!(p.details.traffic_delay, 0.0);
        assert_eq!(p.details.heuristic_delay, 10.0);
        assert_eq!(p.details.route_baseline_delay, 3.0);
        assert_eq!(p.details.total_extra_delay, 13.0);
        // Zero travel time + 13 extra fits in the 15 minutes remaining
        assert_eq!(p.net_delay_minutes, 0.0);
        assert!(p.on_time);
        assert_eq!(p.traffic_status, TrafficStatus::Degraded);
        assert_eq!(p.details.predicted_arrival, at(9, 13));
    }

    #[test]
    fn test_degraded_quiet_hour_is_on_time() {
        let predictor = DelayPredictor::new(DisabledTrafficProvider, empty_store());
        let now = at(22, 0);

        let p = predictor.predict_delay(now, at(22, 15), here(), ank(), RouteId(999), 10);

        assert_eq!(p.details.heuristic_delay, 0.0);
        assert_eq!(p.details.route_baseline_delay, 3.0);
        assert_eq!(p.net_delay_minutes, 0.0);
        assert_eq!(p.message, "Shuttle is on time.");
        assert_eq!(p.traffic_status, TrafficStatus::Degraded);
        assert_eq!(p.details.predicted_arrival, at(22, 3));
    }

    #[test]
    fn test_zero_valued_reading_reconciles_to_on_time() {
        let predictor = DelayPredictor::new(FixedTrafficProvider::measured(0.0, 0.0), empty_store());
        let now = at(22, 0);

        let p = predictor.predict_delay(now, at(22, 15), here(), ank(), RouteId(999), 10);

        assert_eq!(p.details.traffic_delay, 0.0);
        assert_eq!(p.details.total_extra_delay, 3.0);
        assert_eq!(p.net_delay_minutes, 0.0);
        assert_eq!(p.message, "Shuttle is on time.");
        assert!(p.on_time);
        assert_eq!(p.traffic_status, TrafficStatus::Measured);
    }

    #[test]
    fn test_degraded_late_when_extra_exceeds_remaining() {
        let predictor = DelayPredictor::new(DisabledTrafficProvider, empty_store());
        let now = at(17, 0);

        // 10 peak + 5 crowding + 3 baseline = 18 vs 6 remaining
        let p = predictor.predict_delay(now, at(17, 6), here(), ank(), RouteId(999), 80);
        assert_eq!(p.net_delay_minutes, 12.0);
        assert_eq!(p.message, "Shuttle 12 minutes late.");
    }

    #[test]
    fn test_measured_baseline_equal_to_schedule() {
        // Typical travel time matches the schedule exactly
        let predictor = DelayPredictor::new(FixedTrafficProvider::measured(15.0, 15.0), empty_store());
        let now = at(9, 0);

        let p = predictor.predict_delay(now, now + Duration::minutes(15), here(), ank(), RouteId(1), 40);

        assert_eq!(p.net_delay_minutes, 13.0);
        assert_eq!(p.message, "Shuttle 13 minutes late.");
        assert_eq!(p.traffic_status, TrafficStatus::Measured);
    }

    #[test]
    fn test_quiet_hour_within_schedule_is_on_time() {
        // 10 min typical + 3 min baseline fits in 15 min remaining
        let predictor = DelayPredictor::new(FixedTrafficProvider::measured(10.0, 10.0), empty_store());
        let now = at(22, 0);

        let p = predictor.predict_delay(now, now + Duration::minutes(15), here(), ank(), RouteId(1), 10);

        assert_eq!(p.details.heuristic_delay, 0.0);
        assert_eq!(p.details.route_baseline_delay, 3.0);
        assert_eq!(p.net_delay_minutes, 0.0);
        assert_eq!(p.message, "Shuttle is on time.");
        assert!(p.on_time);
    }

    #[test]
    fn test_grace_band_boundary() {
        // 12 typical + 3 baseline = 15 vs 14 remaining → exactly 1 minute late
        let predictor = DelayPredictor::new(FixedTrafficProvider::measured(12.0, 12.0), empty_store());
        let now = at(22, 0);

        let p = predictor.predict_delay(now, now + Duration::minutes(14), here(), ank(), RouteId(1), 0);
        assert_eq!(p.net_delay_minutes, 1.0);
        assert!(p.on_time);

        let p = predictor.predict_delay(now, now + Duration::seconds(14 * 60 - 30), here(), ank(), RouteId(1), 0);
        assert_eq!(p.net_delay_minutes, 1.5);
        assert_eq!(p.message, "Shuttle 2 minutes late.");
    }

    #[test]
    fn test_traffic_delay_included() {
        let store = empty_store();
        store.set_baseline(RouteId(103), 2.5);
        let predictor = DelayPredictor::new(FixedTrafficProvider::measured(14.0, 10.0), store);
        let now = at(14, 0);

        // 10 typical + (4 traffic + 2.5 baseline + 2 crowding) = 18.5 vs 15
        let p = predictor.predict_delay(now, now + Duration::minutes(15), here(), ank(), RouteId(103), 60);
        assert_eq!(p.details.traffic_delay, 4.0);
        assert_eq!(p.details.route_baseline_delay, 2.5);
        assert_eq!(p.details.heuristic_delay, 2.0);
        assert_eq!(p.net_delay_minutes, 3.5);
        assert_eq!(p.details.predicted_arrival, now + Duration::seconds(18 * 60 + 30));
    }

    #[test]
    fn test_missed_schedule_reports_lateness() {
        let predictor = DelayPredictor::new(FixedTrafficProvider::measured(5.0, 5.0), empty_store());
        let now = at(23, 0);

        // Scheduled 2 minutes ago; 5 typical + 3 baseline → 10 minutes late
        let p = predictor.predict_delay(now, now - Duration::minutes(2), here(), ank(), RouteId(1), 0);
        assert_eq!(p.net_delay_minutes, 10.0);
    }

    #[test]
    fn test_degraded_outcome_distinguishable() {
        let predictor = DelayPredictor::new(
            FixedTrafficProvider::degraded(TrafficError::HttpError("timeout".into())),
            empty_store(),
        );
        let now = at(22, 0);
        let p = predictor.predict_delay(now, now + Duration::minutes(2), here(), ank(), RouteId(1), 10);
        assert_eq!(p.traffic_status, TrafficStatus::Degraded);
        assert_eq!(p.details.traffic_delay, 0.0);
        assert_eq!(p.details.total_extra_delay, 3.0);
        assert_eq!(p.net_delay_minutes, 1.0);

        // Same values measured: only the status differs
        let measured = DelayPredictor::new(FixedTrafficProvider::measured(0.0, 0.0), empty_store());
        let q = measured.predict_delay(now, now + Duration::minutes(2), here(), ank(), RouteId(1), 10);
        assert_eq!(q.net_delay_minutes, p.net_delay_minutes);
        assert_eq!(q.traffic_status, TrafficStatus::Measured);
    }

    #[test]
    fn test_custom_grace_and_policy() {
        let config = PredictorConfig::default()
            .with_heuristic(HeuristicPolicy::peak_only())
            .with_grace_minutes(5.0);
        let predictor = DelayPredictor::with_config(DisabledTrafficProvider, empty_store(), config);
        let now = at(11, 0);

        let p = predictor.predict_delay(now, now - Duration::minutes(1), here(), ank(), RouteId(1), 0);
        assert_eq!(p.details.heuristic_delay, 0.0);
        assert_eq!(p.net_delay_minutes, 4.0);
        assert!(p.on_time);
    }

    #[test]
    fn test_idempotent() {
        let store = empty_store();
        store.set_baseline(RouteId(5), 3.7);
        let predictor = DelayPredictor::new(FixedTrafficProvider::measured(12.0, 9.0), store);
        let now = at(17, 45);
        let req = PredictionRequest::new(now, now + Duration::minutes(20), here(), ank(), RouteId(5), 77);

        assert_eq!(predictor.predict(&req), predictor.predict(&req));
    }

    #[test]
    fn test_json_field_names() {
        let predictor = DelayPredictor::new(DisabledTrafficProvider, empty_store());
        let now = at(9, 0);
        let p = predictor.predict_delay(now, now + Duration::minutes(15), here(), ank(), RouteId(1), 40);

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["net_delay_minutes"], 0.0);
        assert_eq!(json["on_time"], true);
        assert_eq!(json["traffic_status"], "degraded");
        assert_eq!(json["details"]["route_baseline_delay"], 3.0);
        assert_eq!(json["details"]["heuristic_delay"], 10.0);
        assert_eq!(json["details"]["traffic_delay"], 0.0);
        assert_eq!(json["details"]["total_extra_delay"], 13.0);
        assert_eq!(json["details"]["predicted_arrival"], "2024-05-01T09:13:00");
    }

    #[test]
    fn test_concurrent_predictions() {
        let store = empty_store();
        store.set_baseline(RouteId(1), 3.5);
        let predictor = Arc::new(DelayPredictor::new(FixedTrafficProvider::measured(10.0, 8.0), store));
        let now = at(8, 30);
        let req = PredictionRequest::new(now, now + Duration::minutes(12), here(), ank(), RouteId(1), 60);
        let expected = predictor.predict(&req);

        std::thread::scope(|s| {
            for _ in 0..4 {
                let predictor = Arc::clone(&predictor);
                let req = req.clone();
                let expected = expected.clone();
                s.spawn(move || {
                    for _ in 0..50 {
                        assert_eq!(predictor.predict(&req), expected);
                    }
                });
            }
        });
    }

    #[test]
    fn test_add_minutes_saturates() {
        let now = at(0, 0);
        assert_eq!(add_minutes(now, f64::INFINITY), NaiveDateTime::MAX);
        assert_eq!(add_minutes(now, -1e18), NaiveDateTime::MIN);
        assert_eq!(add_minutes(now, 1.5), now + Duration::seconds(90));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_net_delay_never_negative(
                hour in 0u32..24,
                passengers in 0u32..200,
                remaining_secs in -7200i64..7200,
                live in 0.0f64..120.0,
                typical in 0.0f64..120.0,
                degraded in any::<bool>(),
            ) {
                let provider = if degraded {
                    FixedTrafficProvider::degraded(TrafficError::NoRoute)
                } else {
                    FixedTrafficProvider::measured(live, typical)
                };
                let predictor = DelayPredictor::new(provider, empty_store());
                let now = at(hour, 0);
                let p = predictor.predict_delay(
                    now,
                    now + Duration::seconds(remaining_secs),
                    here(),
                    ank(),
                    RouteId(1),
                    passengers,
                );
                prop_assert!(p.net_delay_minutes >= 0.0);
            }

            #[test]
            fn prop_degraded_unknown_route_extra_is_heuristic_plus_default(
                hour in 0u32..24,
                passengers in 0u32..200,
            ) {
                let predictor = DelayPredictor::new(DisabledTrafficProvider, empty_store());
                let now = at(hour, 0);
                // Due now: the whole extra delay is lateness
                let p = predictor.predict_delay(now, now, here(), ank(), RouteId(42), passengers);
                let expected = HeuristicPolicy::default().delay_minutes(hour, passengers) + 3.0;
                prop_assert_eq!(p.details.total_extra_delay, expected);
                prop_assert_eq!(p.net_delay_minutes, expected);
                prop_assert_eq!(p.details.predicted_arrival, now + Duration::minutes(expected as i64));
            }
        }
    }
}
