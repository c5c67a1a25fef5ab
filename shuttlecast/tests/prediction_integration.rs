//! End-to-end tests: seed a topology on disk, simulate a shuttle on one of
//! its legs and run the predictor against fixed traffic.
//!
//! Run with: `cargo test --test prediction_integration`

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use shuttlecast::baseline::RouteBaselineStore;
use shuttlecast::demo;
use shuttlecast::model::RouteId;
use shuttlecast::predictor::{DelayPredictor, PredictionRequest, TrafficStatus};
use shuttlecast::topology::{JsonTopologyStore, Topology, TopologyStore};
use shuttlecast::traffic::{FixedTrafficProvider, TrafficError};

// ============================================================================
// Helper Functions
// ============================================================================

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Seed a fresh JSON store and load it back.
fn seeded_topology(dir: &TempDir) -> Topology {
    let store = JsonTopologyStore::new(dir.path().join("topology.json"));
    let report = store
        .save_if_absent(&demo::stops(), &demo::routes())
        .unwrap();
    assert!(report.wrote_anything());
    store.load_topology().unwrap()
}

/// Request for a shuttle on `leg` of `route`, due in `scheduled_in` minutes.
fn request_on_leg(
    topology: &Topology,
    route: RouteId,
    leg: usize,
    now: NaiveDateTime,
    scheduled_in: i64,
    passengers: u32,
    rng: &mut StdRng,
) -> PredictionRequest {
    let (from, to) = topology.leg(route, leg).unwrap().unwrap();
    let location = demo::simulate_live_location(&from.location, &to.location, rng);
    PredictionRequest::new(
        now,
        now + Duration::minutes(scheduled_in),
        location,
        to.location,
        route,
        passengers,
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_seeded_route_with_measured_traffic() {
    let dir = TempDir::new().unwrap();
    let topology = seeded_topology(&dir);
    let mut rng = StdRng::seed_from_u64(2024);

    let baselines = Arc::new(RouteBaselineStore::new());
    baselines.simulate(topology.route_ids(), &mut rng);
    assert_eq!(baselines.len(), 6);

    // Typical 10 min, live 12 min: 2 min traffic
    let predictor = DelayPredictor::new(FixedTrafficProvider::measured(12.0, 10.0), baselines.clone());

    // 22:00 is outside every band; 70 passengers is over capacity
    let request = request_on_leg(&topology, demo::DEFAULT_ROUTE, 0, at(22, 0), 15, 70, &mut rng);
    let prediction = predictor.predict(&request);

    let baseline = baselines.get_baseline(demo::DEFAULT_ROUTE);
    assert!((2.5..4.5).contains(&baseline));

    assert_eq!(prediction.traffic_status, TrafficStatus::Measured);
    assert_eq!(prediction.details.traffic_delay, 2.0);
    assert_eq!(prediction.details.heuristic_delay, 2.0);
    assert!((prediction.details.route_baseline_delay - baseline).abs() <= 0.051);

    // 10 + (2 + b + 2) - 15 = b - 1
    assert!((prediction.net_delay_minutes - (baseline - 1.0)).abs() <= 0.051);
    assert!(prediction.net_delay_minutes > 1.0);
    assert!(!prediction.on_time);
    assert!(prediction.message.ends_with("minutes late."));
}

#[test]
fn test_degraded_traffic_rush_hour() {
    let dir = TempDir::new().unwrap();
    let topology = seeded_topology(&dir);
    let mut rng = StdRng::seed_from_u64(9);

    // No simulated baselines: every route falls back to 3.0
    let predictor = DelayPredictor::new(
        FixedTrafficProvider::degraded(TrafficError::Disabled),
        Arc::new(RouteBaselineStore::new()),
    );

    let request = request_on_leg(&topology, RouteId(201), 1, at(9, 15), 15, 40, &mut rng);
    let prediction = predictor.predict(&request);

    assert_eq!(prediction.traffic_status, TrafficStatus::Degraded);
    assert_eq!(prediction.details.traffic_delay, 0.0);
    assert_eq!(prediction.details.route_baseline_delay, 3.0);
    assert_eq!(prediction.details.heuristic_delay, 10.0);
    assert_eq!(prediction.details.total_extra_delay, 13.0);
    assert_eq!(prediction.net_delay_minutes, 0.0);
    assert_eq!(prediction.message, "Shuttle is on time.");
    assert_eq!(prediction.details.predicted_arrival, at(9, 28));

    // Five minutes out the same extra delay no longer fits
    let request = request_on_leg(&topology, RouteId(201), 1, at(9, 15), 5, 40, &mut rng);
    let prediction = predictor.predict(&request);
    assert_eq!(prediction.net_delay_minutes, 8.0);
    assert_eq!(prediction.message, "Shuttle 8 minutes late.");
}

#[test]
fn test_reseeding_keeps_single_copy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("topology.json");

    let store = JsonTopologyStore::new(&path);
    store.save_if_absent(&demo::stops(), &demo::routes()).unwrap();

    // Simulates a second process start
    let again = JsonTopologyStore::new(&path);
    let report = again.save_if_absent(&demo::stops(), &demo::routes()).unwrap();
    assert!(!report.wrote_anything());

    let topology = again.load_topology().unwrap();
    assert_eq!(topology.stops().count(), 5);
    assert_eq!(topology.routes().count(), 6);
}

#[test]
fn test_shared_predictor_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let topology = seeded_topology(&dir);
    let mut rng = StdRng::seed_from_u64(5);

    let baselines = Arc::new(RouteBaselineStore::new());
    baselines.simulate(topology.route_ids(), &mut rng);
    let predictor = Arc::new(DelayPredictor::new(
        FixedTrafficProvider::measured(8.0, 7.5),
        baselines,
    ));
    let request = request_on_leg(&topology, RouteId(102), 0, at(17, 40), 12, 78, &mut rng);

    let expected = predictor.predict(&request);
    std::thread::scope(|s| {
        for _ in 0..4 {
            let predictor = Arc::clone(&predictor);
            let request = request.clone();
            let expected = expected.clone();
            s.spawn(move || assert_eq!(predictor.predict(&request), expected));
        }
    });
}

#[test]
fn test_prediction_json_shape() {
    let predictor = DelayPredictor::new(
        FixedTrafficProvider::degraded(TrafficError::NoRoute),
        Arc::new(RouteBaselineStore::new()),
    );
    let stops = demo::stops();
    let prediction = predictor.predict_delay(
        at(22, 0),
        at(22, 15),
        stops[3].location,
        stops[1].location,
        RouteId(999),
        10,
    );

    // Degraded traffic counts as zero travel time
    let json = serde_json::to_value(&prediction).unwrap();
    assert_eq!(json["net_delay_minutes"], 0.0);
    assert_eq!(json["message"], "Shuttle is on time.");
    assert_eq!(json["on_time"], true);
    assert_eq!(json["traffic_status"], "degraded");
    assert_eq!(json["details"]["route_baseline_delay"], 3.0);
    assert_eq!(json["details"]["predicted_arrival"], "2024-05-01T22:03:00");
}
