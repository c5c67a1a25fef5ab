//! Shared setup for commands that do real work.
//!
//! Loads the config file, installs logging and builds the library objects
//! (topology store, baseline store, predictor) from settings plus CLI
//! overrides.

use std::sync::Arc;

use shuttlecast::baseline::RouteBaselineStore;
use shuttlecast::config::ConfigFile;
use shuttlecast::logging::{init_logging, LoggingGuard};
use shuttlecast::predictor::DelayPredictor;
use shuttlecast::topology::JsonTopologyStore;
use shuttlecast::traffic::{provider_from_api_key, TrafficProvider};

use crate::error::CliError;

/// Predictor type used by the CLI.
pub type CliPredictor = DelayPredictor<Box<dyn TrafficProvider>>;

pub struct CliRunner {
    config: ConfigFile,
    _logging: Option<LoggingGuard>,
}

impl CliRunner {
    /// Loads configuration and starts logging.
    ///
    /// A log file that cannot be opened is reported and skipped; the
    /// command still runs.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging = match init_logging(&config.logging.file, verbose) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Warning: file logging disabled: {}", e);
                None
            }
        };

        Ok(Self {
            config,
            _logging: logging,
        })
    }

    pub fn log_startup(&self, command: &str) {
        tracing::info!(
            version = shuttlecast::VERSION,
            command,
            topology = %self.config.topology.path.display(),
            "shuttlecast starting"
        );
    }

    pub fn topology_store(&self) -> JsonTopologyStore {
        JsonTopologyStore::new(&self.config.topology.path)
    }

    /// An empty baseline store with the configured default.
    pub fn baseline_store(&self) -> Arc<RouteBaselineStore> {
        self.config.baseline_store()
    }

    /// Builds the predictor. CLI values override the config file.
    pub fn create_predictor(
        &self,
        cli_api_key: Option<String>,
        cli_timeout: Option<u64>,
        baselines: Arc<RouteBaselineStore>,
    ) -> Result<CliPredictor, CliError> {
        let api_key = self.config.resolve_api_key(cli_api_key);
        let timeout = cli_timeout.unwrap_or(self.config.traffic.timeout);
        let provider = provider_from_api_key(api_key, timeout)?;

        Ok(DelayPredictor::with_config(
            provider,
            baselines,
            self.config.predictor_config(),
        ))
    }
}
