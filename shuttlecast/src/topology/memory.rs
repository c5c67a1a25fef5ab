//! In-process topology store.

use parking_lot::RwLock;

use super::{check_route_stops, SeedReport, TopologyResult, TopologyStore};
use crate::model::{Route, Stop};

#[derive(Debug, Default)]
struct Records {
    stops: Vec<Stop>,
    routes: Vec<Route>,
}

/// Topology store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryTopologyStore {
    records: RwLock<Records>,
}

impl MemoryTopologyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TopologyStore for MemoryTopologyStore {
    fn load_stops(&self) -> TopologyResult<Vec<Stop>> {
        Ok(self.records.read().stops.clone())
    }

    fn load_routes(&self) -> TopologyResult<Vec<Route>> {
        Ok(self.records.read().routes.clone())
    }

    fn save_if_absent(&self, stops: &[Stop], routes: &[Route]) -> TopologyResult<SeedReport> {
        let mut records = self.records.write();
        let mut report = SeedReport::default();

        if records.routes.is_empty() {
            let known = if records.stops.is_empty() {
                stops
            } else {
                records.stops.as_slice()
            };
            check_route_stops(known, routes)?;
        }

        if records.stops.is_empty() {
            records.stops.extend_from_slice(stops);
            report.stops_written = stops.len();
        }
        if records.routes.is_empty() {
            records.routes.extend_from_slice(routes);
            report.routes_written = routes.len();
        }

        Ok(report)
    }
}
