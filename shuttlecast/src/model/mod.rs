//! Shuttle network domain model.
//!
//! Stops and routes form the static topology loaded at startup. Trips and
//! live locations describe a vehicle in service; they are carried for callers
//! that track vehicles but the delay predictor itself only needs coordinates.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

numeric_id!(
    /// Unique, stable identifier of a stop.
    StopId
);
numeric_id!(
    /// Unique identifier of a route.
    RouteId
);

/// Identifier of a single scheduled trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TripId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Direction of travel relative to the main campus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A named stop at a fixed location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub location: GeoPoint,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }
}

/// A fixed route: an ordered sequence of stops.
///
/// The order of `stops` is the direction of travel. Every id must refer to a
/// known [`Stop`]; [`crate::topology::Topology`] checks this when routes and
/// stops are brought together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub stops: Vec<StopId>,
    pub distance_km: f64,
    pub direction: Direction,
}

impl Route {
    pub fn new(
        id: RouteId,
        name: impl Into<String>,
        stops: Vec<StopId>,
        distance_km: f64,
        direction: Direction,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            stops,
            distance_km,
            direction,
        }
    }

    /// The stop following `stop` on this route, if any.
    pub fn next_stop_after(&self, stop: StopId) -> Option<StopId> {
        let pos = self.stops.iter().position(|s| *s == stop)?;
        self.stops.get(pos + 1).copied()
    }

    /// The `index`-th leg as a `(from, to)` pair.
    pub fn leg(&self, index: usize) -> Option<(StopId, StopId)> {
        let from = *self.stops.get(index)?;
        let to = *self.stops.get(index + 1)?;
        Some((from, to))
    }

    /// The leg a vehicle starting this route is on.
    pub fn first_leg(&self) -> Option<(StopId, StopId)> {
        self.leg(0)
    }

    /// Number of legs (consecutive stop pairs).
    pub fn leg_count(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }
}

/// A scheduled run of a vehicle along a route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub scheduled_start: NaiveDateTime,
}

/// A timestamped vehicle position for a trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveLocation {
    pub trip_id: TripId,
    pub location: GeoPoint,
    pub observed_at: NaiveDateTime,
}
