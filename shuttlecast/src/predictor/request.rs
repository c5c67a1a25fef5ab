//! Validated prediction inputs.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::coord::{CoordError, GeoPoint};
use crate::model::RouteId;

/// Rejected prediction inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Invalid {field} coordinate: {source}")]
    InvalidCoordinate {
        field: &'static str,
        #[source]
        source: CoordError,
    },

    #[error("Passenger count cannot be negative: {0}")]
    NegativePassengerCount(i64),

    #[error("Passenger count too large: {0}")]
    PassengerCountOverflow(i64),
}

/// Everything the predictor needs for one vehicle on one leg.
///
/// Construction through [`PredictionRequest::from_raw`] validates raw caller
/// input; the typed fields make invalid coordinates and negative passenger
/// counts unrepresentable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub current_time: NaiveDateTime,
    pub scheduled_arrival: NaiveDateTime,
    pub current_location: GeoPoint,
    pub next_stop_location: GeoPoint,
    pub route_id: RouteId,
    pub passenger_count: u32,
}

impl PredictionRequest {
    pub fn new(
        current_time: NaiveDateTime,
        scheduled_arrival: NaiveDateTime,
        current_location: GeoPoint,
        next_stop_location: GeoPoint,
        route_id: RouteId,
        passenger_count: u32,
    ) -> Self {
        Self {
            current_time,
            scheduled_arrival,
            current_location,
            next_stop_location,
            route_id,
            passenger_count,
        }
    }

    /// Validates untyped input at the system boundary.
    pub fn from_raw(
        current_time: NaiveDateTime,
        scheduled_arrival: NaiveDateTime,
        current_location: (f64, f64),
        next_stop_location: (f64, f64),
        route_id: RouteId,
        passenger_count: i64,
    ) -> Result<Self, PredictionError> {
        let current_location = GeoPoint::try_from(current_location).map_err(|source| {
            PredictionError::InvalidCoordinate {
                field: "current_location",
                source,
            }
        })?;
        let next_stop_location = GeoPoint::try_from(next_stop_location).map_err(|source| {
            PredictionError::InvalidCoordinate {
                field: "next_stop_location",
                source,
            }
        })?;

        if passenger_count < 0 {
            return Err(PredictionError::NegativePassengerCount(passenger_count));
        }
        let passenger_count = u32::try_from(passenger_count)
            .map_err(|_| PredictionError::PassengerCountOverflow(passenger_count))?;

        Ok(Self::new(
            current_time,
            scheduled_arrival,
            current_location,
            next_stop_location,
            route_id,
            passenger_count,
        ))
    }

    /// Minutes until the scheduled arrival; negative once it has passed.
    pub fn time_remaining_minutes(&self) -> f64 {
        (self.scheduled_arrival - self.current_time).num_milliseconds() as f64 / 60_000.0
    }
}
