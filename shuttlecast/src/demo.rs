//! Demo campus network and live-data simulation.
//!
//! Five stops around the main campus and six routes: three inbound to Vadi
//! Campus via ANK and their outbound mirrors.

use chrono::NaiveDateTime;
use rand::Rng;

use crate::coord::GeoPoint;
use crate::model::{Direction, LiveLocation, Route, RouteId, Stop, StopId, Trip, TripId};

/// Max jitter applied to a simulated position, in degrees.
pub const LOCATION_JITTER_DEG: f64 = 0.005;

/// Passenger range drawn by [`simulated_passenger_count`].
pub const SIMULATED_PASSENGERS: std::ops::RangeInclusive<u32> = 60..=80;

/// Route simulated when none is chosen.
pub const DEFAULT_ROUTE: RouteId = RouteId(103);

/// Minutes until the scheduled arrival in a default simulation.
pub const DEFAULT_SCHEDULED_IN_MINUTES: i64 = 15;

const STOPS: [(u32, &str, f64, f64); 5] = [
    (1, "Vadi Campus", 41.0652, 29.0062),
    (2, "ANK", 41.0884, 29.0441),
    (3, "Trump AVM", 41.0664, 28.9858),
    (4, "Kağıthane", 40.9904, 29.0201),
    (5, "Topkapı Campus", 41.0423, 29.0051),
];

const ROUTES: [(u32, &str, [u32; 3], f64, Direction); 6] = [
    (101, "Topkapı-ANK-Vadi", [5, 2, 1], 20.0, Direction::Inbound),
    (102, "Trump-ANK-Vadi", [3, 2, 1], 12.0, Direction::Inbound),
    (103, "Kağıthane-ANK-Vadi", [4, 2, 1], 7.0, Direction::Inbound),
    (201, "Vadi-ANK-Topkapı", [1, 2, 5], 20.0, Direction::Outbound),
    (202, "Vadi-ANK-Trump", [1, 2, 3], 12.0, Direction::Outbound),
    (203, "Vadi-ANK-Kağıthane", [1, 2, 4], 7.0, Direction::Outbound),
];

pub fn stops() -> Vec<Stop> {
    STOPS
        .iter()
        .map(|&(id, name, lat, lon)| Stop::new(StopId(id), name, GeoPoint::fixed(lat, lon)))
        .collect()
}

pub fn routes() -> Vec<Route> {
    ROUTES
        .iter()
        .map(|&(id, name, sequence, km, direction)| {
            Route::new(
                RouteId(id),
                name,
                sequence.iter().copied().map(StopId).collect(),
                km,
                direction,
            )
        })
        .collect()
}

/// A position somewhere near the middle of the leg `from -> to`.
pub fn simulate_live_location<R: Rng + ?Sized>(from: &GeoPoint, to: &GeoPoint, rng: &mut R) -> GeoPoint {
    let jitter = -LOCATION_JITTER_DEG..=LOCATION_JITTER_DEG;
    from.midpoint(to)
        .offset(rng.random_range(jitter.clone()), rng.random_range(jitter))
}

pub fn simulated_passenger_count<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(SIMULATED_PASSENGERS)
}

/// A trip on `route` starting at `start`, with a position sampled on `leg`.
pub fn simulate_trip<R: Rng + ?Sized>(
    route: &Route,
    from: &Stop,
    to: &Stop,
    start: NaiveDateTime,
    rng: &mut R,
) -> (Trip, LiveLocation) {
    let trip_id = TripId::new(format!("{}-{}", route.id, start.format("%Y%m%d%H%M")));
    let trip = Trip {
        id: trip_id.clone(),
        route_id: route.id,
        scheduled_start: start,
    };
    let location = LiveLocation {
        trip_id,
        location: simulate_live_location(&from.location, &to.location, rng),
        observed_at: start,
    };
    (trip, location)
}
