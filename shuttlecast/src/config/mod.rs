//! Configuration file management.
//!
//! Settings live in an INI file at `~/.shuttlecast/config.ini`. A missing
//! file means defaults; CLI flags override whatever the file says.
//!
//! ```ini
//! [traffic]
//! google_api_key = ...
//! timeout = 10
//!
//! [baseline]
//! default_minutes = 3.0
//!
//! [heuristic]
//! max_capacity = 50
//! off_peak_band = true
//!
//! [prediction]
//! grace_minutes = 1.0
//!
//! [topology]
//! path = ~/.shuttlecast/topology.json
//!
//! [logging]
//! file = ~/.shuttlecast/shuttlecast.log
//! ```

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, expand_tilde, resolve_api_key_with, BaselineSettings,
    ConfigError, ConfigFile, HeuristicSettings, LoggingSettings, PredictionSettings,
    TopologySettings, TrafficSettings, API_KEY_ENV,
};
pub use keys::ConfigKey;
