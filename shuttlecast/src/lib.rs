//! Shuttlecast - arrival delay prediction for campus shuttles
//!
//! Given where a shuttle is now, where it stops next and when it is due
//! there, the [`predictor::DelayPredictor`] combines three delay sources
//! into one net estimate:
//!
//! - live traffic from a [`traffic::TrafficProvider`]
//! - a per-route historical baseline from [`baseline::RouteBaselineStore`]
//! - a time-of-day and crowding [`heuristic`]
//!
//! The static network (stops and routes) is persisted through a
//! [`topology::TopologyStore`].

pub mod baseline;
pub mod config;
pub mod coord;
pub mod demo;
pub mod heuristic;
pub mod logging;
pub mod model;
pub mod predictor;
pub mod topology;
pub mod traffic;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use predictor::{DelayPredictor, Prediction, PredictionRequest};
