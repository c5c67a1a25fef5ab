//! Per-route structural delay baselines.
//!
//! Each route has a historically observed average delay that is not explained
//! by traffic or crowding (loading ramps, campus gates, habitual slow
//! sections). The store maps route ids to that value in minutes and answers
//! with a default for routes it has never seen.
//!
//! # Thread Safety
//!
//! The map lives behind `RwLock<Arc<HashMap>>`. Readers clone the `Arc` and
//! release the lock immediately; writers build a new map and swap it in, so a
//! reader always observes either the old or the new map in full.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;

use crate::model::RouteId;

/// Baseline used for routes with no recorded history.
pub const DEFAULT_BASELINE_MINUTES: f64 = 3.0;

/// Range used by [`RouteBaselineStore::simulate`].
pub const SIMULATED_BASELINE_RANGE: std::ops::Range<f64> = 2.5..4.5;

/// Route id → average structural delay in minutes.
#[derive(Debug)]
pub struct RouteBaselineStore {
    entries: RwLock<Arc<HashMap<RouteId, f64>>>,
    default_minutes: f64,
}

impl Default for RouteBaselineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteBaselineStore {
    /// Creates an empty store with the 3.0 minute default.
    pub fn new() -> Self {
        Self::with_default(DEFAULT_BASELINE_MINUTES)
    }

    /// Creates an empty store with a custom fallback value.
    pub fn with_default(default_minutes: f64) -> Self {
        Self {
            entries: RwLock::new(Arc::new(HashMap::new())),
            default_minutes: clean(default_minutes).unwrap_or(DEFAULT_BASELINE_MINUTES),
        }
    }

    /// Creates a store pre-populated from `mapping`.
    pub fn from_map(mapping: HashMap<RouteId, f64>) -> Self {
        Self::from_map_with_default(mapping, DEFAULT_BASELINE_MINUTES)
    }

    /// Like [`from_map`](Self::from_map), with a custom fallback value.
    pub fn from_map_with_default(mapping: HashMap<RouteId, f64>, default_minutes: f64) -> Self {
        let store = Self::with_default(default_minutes);
        store.replace(mapping);
        store
    }

    /// Fallback returned for unknown routes.
    pub fn default_minutes(&self) -> f64 {
        self.default_minutes
    }

    /// Baseline for `route_id`, or the default when the route is unknown.
    pub fn get_baseline(&self, route_id: RouteId) -> f64 {
        match self.entries.read().get(&route_id) {
            Some(minutes) => *minutes,
            None => {
                tracing::debug!(
                    route = %route_id,
                    default = self.default_minutes,
                    "No baseline recorded for route, using default"
                );
                self.default_minutes
            }
        }
    }

    /// Whether the store has an entry for `route_id`.
    pub fn contains(&self, route_id: RouteId) -> bool {
        self.entries.read().contains_key(&route_id)
    }

    /// Insert or overwrite one entry.
    ///
    /// Negative values are clamped to zero; non-finite values are ignored.
    pub fn set_baseline(&self, route_id: RouteId, minutes: f64) {
        self.update(std::iter::once((route_id, minutes)));
    }

    /// Insert or overwrite many entries in one swap.
    pub fn update<I>(&self, mapping: I)
    where
        I: IntoIterator<Item = (RouteId, f64)>,
    {
        let mut guard = self.entries.write();
        let mut next = HashMap::clone(&guard);
        for (route_id, minutes) in mapping {
            if let Some(minutes) = checked(route_id, minutes) {
                next.insert(route_id, minutes);
            }
        }
        *guard = Arc::new(next);
    }

    /// Replace the whole map atomically.
    pub fn replace(&self, mapping: HashMap<RouteId, f64>) {
        let next: HashMap<RouteId, f64> = mapping
            .into_iter()
            .filter_map(|(route_id, minutes)| checked(route_id, minutes).map(|m| (route_id, m)))
            .collect();
        *self.entries.write() = Arc::new(next);
    }

    /// Seed every route with a uniformly random baseline in
    /// [`SIMULATED_BASELINE_RANGE`], standing in for historical observations.
    pub fn simulate<R, I>(&self, route_ids: I, rng: &mut R)
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = RouteId>,
    {
        let simulated: Vec<(RouteId, f64)> = route_ids
            .into_iter()
            .map(|id| (id, rng.random_range(SIMULATED_BASELINE_RANGE)))
            .collect();
        tracing::info!(routes = simulated.len(), "Seeded simulated route baselines");
        self.update(simulated);
    }

    /// Point-in-time copy of all entries.
    pub fn snapshot(&self) -> Arc<HashMap<RouteId, f64>> {
        Arc::clone(&self.entries.read())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn clean(minutes: f64) -> Option<f64> {
    minutes.is_finite().then(|| minutes.max(0.0))
}

fn checked(route_id: RouteId, minutes: f64) -> Option<f64> {
    let cleaned = clean(minutes);
    if cleaned.is_none() {
        tracing::warn!(route = %route_id, minutes, "Ignoring non-finite route baseline");
    }
    cleaned
}
