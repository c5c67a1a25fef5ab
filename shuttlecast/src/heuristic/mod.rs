//! Time-of-day and crowding delay heuristic.
//!
//! Estimates extra minutes a shuttle loses to rush-hour congestion and to
//! overcrowding (slow boarding, longer dwell at stops). The estimate is the
//! sum of two independent contributions:
//!
//! ```text
//! hour ─────► time band table ───────► +10 / +3 / 0 ─┐
//!                                                    ├─► minutes
//! passengers ─► capacity thresholds ─► +5 / +2 / 0 ──┘
//! ```
//!
//! The band table is data, not code: [`HeuristicPolicy::default`] carries the
//! peak and off-peak bands, [`HeuristicPolicy::peak_only`] drops the off-peak
//! band. Bands are checked in order and the first one containing the hour
//! wins, so overlapping bands never stack.

use serde::{Deserialize, Serialize};

/// Nominal seated + standing capacity of a shuttle.
pub const DEFAULT_MAX_CAPACITY: u32 = 50;

/// Minutes added when passengers exceed capacity.
pub const OVER_CAPACITY_MINUTES: f64 = 2.0;

/// Minutes added when passengers exceed 150% of capacity.
pub const SEVERE_OVER_CAPACITY_MINUTES: f64 = 5.0;

/// Severe crowding threshold as a multiple of capacity.
const SEVERE_FACTOR: f64 = 1.5;

/// A half-open hour range `[start_hour, end_hour)` with a fixed penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBand {
    pub start_hour: u32,
    pub end_hour: u32,
    pub minutes: f64,
}

impl TimeBand {
    pub const fn new(start_hour: u32, end_hour: u32, minutes: f64) -> Self {
        Self {
            start_hour,
            end_hour,
            minutes,
        }
    }

    #[inline]
    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..self.end_hour).contains(&hour)
    }
}

/// Morning and evening rush.
pub const PEAK_BANDS: [TimeBand; 2] = [TimeBand::new(8, 10, 10.0), TimeBand::new(16, 19, 10.0)];

/// Late morning / lunch and early evening.
pub const OFF_PEAK_BANDS: [TimeBand; 2] = [TimeBand::new(10, 13, 3.0), TimeBand::new(19, 21, 3.0)];

/// Configuration of the heuristic: time bands plus vehicle capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicPolicy {
    bands: Vec<TimeBand>,
    max_capacity: u32,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        let mut bands = PEAK_BANDS.to_vec();
        bands.extend_from_slice(&OFF_PEAK_BANDS);
        Self {
            bands,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl HeuristicPolicy {
    /// Policy with only the rush-hour bands.
    pub fn peak_only() -> Self {
        Self {
            bands: PEAK_BANDS.to_vec(),
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    /// Policy with an explicit band table.
    ///
    /// Earlier bands take precedence when bands overlap. Negative or
    /// non-finite penalties are treated as zero.
    pub fn with_bands(bands: Vec<TimeBand>) -> Self {
        Self {
            bands,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }

    /// Set the vehicle capacity used by the crowding rule.
    pub fn with_max_capacity(mut self, max_capacity: u32) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn bands(&self) -> &[TimeBand] {
        &self.bands
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// Time-of-day contribution for `hour` (0-23).
    pub fn time_minutes(&self, hour: u32) -> f64 {
        self.bands
            .iter()
            .find(|band| band.contains(hour))
            .map(|band| sanitize(band.minutes))
            .unwrap_or(0.0)
    }

    /// Crowding contribution for `passenger_count`.
    ///
    /// Both thresholds are strict: exactly at capacity adds nothing and
    /// exactly at 150% adds the smaller penalty.
    pub fn density_minutes(&self, passenger_count: u32) -> f64 {
        let capacity = f64::from(self.max_capacity);
        let passengers = f64::from(passenger_count);

        if passengers > capacity * SEVERE_FACTOR {
            SEVERE_OVER_CAPACITY_MINUTES
        } else if passengers > capacity {
            OVER_CAPACITY_MINUTES
        } else {
            0.0
        }
    }

    /// Total heuristic delay in minutes: time band plus crowding.
    pub fn delay_minutes(&self, hour: u32, passenger_count: u32) -> f64 {
        self.time_minutes(hour) + self.density_minutes(passenger_count)
    }
}

fn sanitize(minutes: f64) -> f64 {
    if minutes.is_finite() {
        minutes.max(0.0)
    } else {
        0.0
    }
}

/// Heuristic delay with the default policy.
pub fn delay_minutes(hour: u32, passenger_count: u32) -> f64 {
    HeuristicPolicy::default().delay_minutes(hour, passenger_count)
}
