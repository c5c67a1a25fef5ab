//! INI-backed configuration file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ini::Ini;
use thiserror::Error;

use super::keys::ConfigKey;
use crate::baseline::{RouteBaselineStore, DEFAULT_BASELINE_MINUTES};
use crate::heuristic::{HeuristicPolicy, DEFAULT_MAX_CAPACITY};
use crate::predictor::{PredictorConfig, DEFAULT_GRACE_MINUTES};
use crate::traffic::DEFAULT_TIMEOUT_SECS;

/// Environment variable consulted for the Google Maps API key.
pub const API_KEY_ENV: &str = "SHUTTLECAST_GOOGLE_API_KEY";

const CONFIG_DIR_NAME: &str = ".shuttlecast";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Failed to write config file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `~/.shuttlecast`
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// `~/.shuttlecast/config.ini`
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Picks the API key by precedence: CLI flag, then environment, then file.
///
/// Blank values count as unset at every level.
pub fn resolve_api_key_with(
    cli: Option<String>,
    env: Option<String>,
    file: Option<String>,
) -> Option<String> {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSettings {
    pub google_api_key: Option<String>,
    /// HTTP timeout in seconds.
    pub timeout: u64,
}

impl Default for TrafficSettings {
    fn default() -> Self {
        Self {
            google_api_key: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSettings {
    pub default_minutes: f64,
}

impl Default for BaselineSettings {
    fn default() -> Self {
        Self {
            default_minutes: DEFAULT_BASELINE_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicSettings {
    pub max_capacity: u32,
    /// Whether the off-peak shoulder bands contribute.
    pub off_peak_band: bool,
}

impl Default for HeuristicSettings {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
            off_peak_band: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSettings {
    pub grace_minutes: f64,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            grace_minutes: DEFAULT_GRACE_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologySettings {
    pub path: PathBuf,
}

impl Default for TopologySettings {
    fn default() -> Self {
        Self {
            path: config_directory().join("topology.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: config_directory().join("shuttlecast.log"),
        }
    }
}

/// All settings from `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub traffic: TrafficSettings,
    pub baseline: BaselineSettings,
    pub heuristic: HeuristicSettings,
    pub prediction: PredictionSettings,
    pub topology: TopologySettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Loads from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_ini(&ini)
    }

    /// Parses settings from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::ReadFailed {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }

    /// Saves to the default path, creating `~/.shuttlecast` if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: io::Error| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        self.to_ini().write_to_file(path).map_err(write_err)?;
        tracing::debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// The heuristic policy these settings describe.
    pub fn heuristic_policy(&self) -> HeuristicPolicy {
        let policy = if self.heuristic.off_peak_band {
            HeuristicPolicy::default()
        } else {
            HeuristicPolicy::peak_only()
        };
        policy.with_max_capacity(self.heuristic.max_capacity)
    }

    pub fn predictor_config(&self) -> PredictorConfig {
        PredictorConfig::default()
            .with_heuristic(self.heuristic_policy())
            .with_grace_minutes(self.prediction.grace_minutes)
    }

    /// An empty baseline store using the configured fallback.
    pub fn baseline_store(&self) -> Arc<RouteBaselineStore> {
        Arc::new(RouteBaselineStore::with_default(self.baseline.default_minutes))
    }

    /// API key from `cli`, then [`API_KEY_ENV`], then the file.
    pub fn resolve_api_key(&self, cli: Option<String>) -> Option<String> {
        resolve_api_key_with(
            cli,
            std::env::var(API_KEY_ENV).ok(),
            self.traffic.google_api_key.clone(),
        )
    }
}
