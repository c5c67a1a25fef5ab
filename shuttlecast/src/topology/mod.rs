//! Static network topology: stops and routes.
//!
//! Topology is loaded once at startup and never changes while predictions
//! run. Storage is a plain key-indexed record set; route order is carried by
//! each route's stop sequence, so no graph store is needed.
//!
//! # Stores
//!
//! | Store | Backing | Use |
//! |-------|---------|-----|
//! | [`MemoryTopologyStore`] | in-process vectors | tests, embedding |
//! | [`JsonTopologyStore`] | one JSON document on disk | CLI |
//!
//! Both implement [`TopologyStore`]. Seeding goes through
//! [`TopologyStore::save_if_absent`], which only writes collections that are
//! currently empty so repeated startups never duplicate records.

mod json;
mod memory;

pub use json::{default_topology_path, JsonTopologyStore};
pub use memory::MemoryTopologyStore;

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Route, RouteId, Stop, StopId};

/// Errors from topology stores and validation.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Failed to read topology from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write topology to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupt topology file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Route {route} references unknown stop {stop}")]
    UnknownStop { route: RouteId, stop: StopId },

    #[error("Duplicate stop id {0}")]
    DuplicateStop(StopId),

    #[error("Duplicate route id {0}")]
    DuplicateRoute(RouteId),

    #[error("Route {0} not found")]
    RouteNotFound(RouteId),
}

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// What [`TopologyStore::save_if_absent`] actually wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub stops_written: usize,
    pub routes_written: usize,
}

impl SeedReport {
    pub fn wrote_anything(&self) -> bool {
        self.stops_written > 0 || self.routes_written > 0
    }
}

/// Persistence for stops and routes.
pub trait TopologyStore: Send + Sync {
    fn load_stops(&self) -> TopologyResult<Vec<Stop>>;

    fn load_routes(&self) -> TopologyResult<Vec<Route>>;

    /// Idempotent seeding.
    ///
    /// Stops are written only if the store holds no stops; routes only if it
    /// holds no routes. The two checks are independent. Routes about to be
    /// written must reference only stops the store will hold afterwards,
    /// otherwise [`TopologyError::UnknownStop`] is returned and nothing is
    /// written.
    fn save_if_absent(&self, stops: &[Stop], routes: &[Route]) -> TopologyResult<SeedReport>;

    /// Loads everything and validates it into a [`Topology`].
    fn load_topology(&self) -> TopologyResult<Topology> {
        Topology::new(self.load_stops()?, self.load_routes()?)
    }
}

/// Fails on the first route stop that is not among `stops`.
pub(crate) fn check_route_stops(stops: &[Stop], routes: &[Route]) -> TopologyResult<()> {
    let known: HashSet<StopId> = stops.iter().map(|s| s.id).collect();
    for route in routes {
        if let Some(stop) = route.stops.iter().find(|s| !known.contains(*s)) {
            return Err(TopologyError::UnknownStop {
                route: route.id,
                stop: *stop,
            });
        }
    }
    Ok(())
}

/// Validated, indexed view of the network.
///
/// Guarantees unique stop and route ids and that every route only references
/// known stops.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    stops: BTreeMap<StopId, Stop>,
    routes: BTreeMap<RouteId, Route>,
}

impl Topology {
    pub fn new(stops: Vec<Stop>, routes: Vec<Route>) -> TopologyResult<Self> {
        let mut stop_map = BTreeMap::new();
        for stop in stops {
            let id = stop.id;
            if stop_map.insert(id, stop).is_some() {
                return Err(TopologyError::DuplicateStop(id));
            }
        }

        let mut route_map = BTreeMap::new();
        for route in routes {
            if let Some(stop) = route.stops.iter().find(|s| !stop_map.contains_key(*s)) {
                return Err(TopologyError::UnknownStop {
                    route: route.id,
                    stop: *stop,
                });
            }
            let id = route.id;
            if route_map.insert(id, route).is_some() {
                return Err(TopologyError::DuplicateRoute(id));
            }
        }

        Ok(Self {
            stops: stop_map,
            routes: route_map,
        })
    }

    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(&id)
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(&id)
    }

    /// Routes ordered by id.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Stops ordered by id.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn route_ids(&self) -> impl Iterator<Item = RouteId> + '_ {
        self.routes.keys().copied()
    }

    /// The `(from, to)` stops of leg `index` on `route_id`.
    pub fn leg(&self, route_id: RouteId, index: usize) -> TopologyResult<Option<(&Stop, &Stop)>> {
        let route = self
            .route(route_id)
            .ok_or(TopologyError::RouteNotFound(route_id))?;

        // Both ids were checked in `new`
        Ok(route
            .leg(index)
            .and_then(|(from, to)| Some((self.stop(from)?, self.stop(to)?))))
    }

    /// Stop names along a route, in travel order.
    pub fn stop_names(&self, route: &Route) -> Vec<&str> {
        route
            .stops
            .iter()
            .filter_map(|id| self.stop(*id).map(|s| s.name.as_str()))
            .collect()
    }

    /// Stops not served by any route.
    pub fn unused_stops(&self) -> Vec<StopId> {
        let used: HashSet<StopId> = self.routes.values().flat_map(|r| r.stops.iter().copied()).collect();
        self.stops.keys().filter(|id| !used.contains(*id)).copied().collect()
    }
}
