//! Typed configuration keys for `config get/set/list`.

use std::fmt;
use std::str::FromStr;

use super::file::{expand_tilde, ConfigError, ConfigFile};

/// A settable configuration key, addressed as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    TrafficGoogleApiKey,
    TrafficTimeout,
    BaselineDefaultMinutes,
    HeuristicMaxCapacity,
    HeuristicOffPeakBand,
    PredictionGraceMinutes,
    TopologyPath,
    LoggingFile,
}

const ALL_KEYS: [ConfigKey; 8] = [
    ConfigKey::TrafficGoogleApiKey,
    ConfigKey::TrafficTimeout,
    ConfigKey::BaselineDefaultMinutes,
    ConfigKey::HeuristicMaxCapacity,
    ConfigKey::HeuristicOffPeakBand,
    ConfigKey::PredictionGraceMinutes,
    ConfigKey::TopologyPath,
    ConfigKey::LoggingFile,
];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// Full dotted name, e.g. `traffic.timeout`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::TrafficGoogleApiKey => "traffic.google_api_key",
            ConfigKey::TrafficTimeout => "traffic.timeout",
            ConfigKey::BaselineDefaultMinutes => "baseline.default_minutes",
            ConfigKey::HeuristicMaxCapacity => "heuristic.max_capacity",
            ConfigKey::HeuristicOffPeakBand => "heuristic.off_peak_band",
            ConfigKey::PredictionGraceMinutes => "prediction.grace_minutes",
            ConfigKey::TopologyPath => "topology.path",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    pub fn section(&self) -> &'static str {
        self.split().0
    }

    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        let name = self.name();
        name.split_once('.').unwrap_or((name, ""))
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::TrafficGoogleApiKey => config.traffic.google_api_key.clone().unwrap_or_default(),
            ConfigKey::TrafficTimeout => config.traffic.timeout.to_string(),
            ConfigKey::BaselineDefaultMinutes => config.baseline.default_minutes.to_string(),
            ConfigKey::HeuristicMaxCapacity => config.heuristic.max_capacity.to_string(),
            ConfigKey::HeuristicOffPeakBand => config.heuristic.off_peak_band.to_string(),
            ConfigKey::PredictionGraceMinutes => config.prediction.grace_minutes.to_string(),
            ConfigKey::TopologyPath => config.topology.path.display().to_string(),
            ConfigKey::LoggingFile => config.logging.file.display().to_string(),
        }
    }

    /// Validates `value` and stores it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::TrafficGoogleApiKey => {
                config.traffic.google_api_key = (!value.is_empty()).then(|| value.to_string());
            }
            ConfigKey::TrafficTimeout => {
                let secs: u64 = self.parse(value)?;
                if secs == 0 {
                    return Err(self.invalid(value, "must be at least 1 second"));
                }
                config.traffic.timeout = secs;
            }
            ConfigKey::BaselineDefaultMinutes => {
                config.baseline.default_minutes = self.parse_minutes(value)?;
            }
            ConfigKey::HeuristicMaxCapacity => {
                config.heuristic.max_capacity = self.parse(value)?;
            }
            ConfigKey::HeuristicOffPeakBand => {
                config.heuristic.off_peak_band = match value.to_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(self.invalid(value, "expected true or false")),
                };
            }
            ConfigKey::PredictionGraceMinutes => {
                config.prediction.grace_minutes = self.parse_minutes(value)?;
            }
            ConfigKey::TopologyPath => {
                config.topology.path = self.parse_path(value)?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = self.parse_path(value)?;
            }
        }
        Ok(())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigError>
    where
        T::Err: fmt::Display,
    {
        value.parse().map_err(|e: T::Err| self.invalid(value, &e.to_string()))
    }

    fn parse_minutes(&self, value: &str) -> Result<f64, ConfigError> {
        let minutes: f64 = self.parse(value)?;
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(self.invalid(value, "must be a non-negative number of minutes"));
        }
        Ok(minutes)
    }

    fn parse_path(&self, value: &str) -> Result<std::path::PathBuf, ConfigError> {
        if value.is_empty() {
            return Err(self.invalid(value, "path cannot be empty"));
        }
        Ok(expand_tilde(value))
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
