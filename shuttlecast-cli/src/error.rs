//! CLI error type.

use std::fmt;

use shuttlecast::config::ConfigError;
use shuttlecast::logging::LoggingError;
use shuttlecast::predictor::PredictionError;
use shuttlecast::topology::TopologyError;
use shuttlecast::traffic::TrafficError;

/// Errors surfaced to the user by `shuttlecast` commands.
#[derive(Debug)]
pub enum CliError {
    /// Bad argument or setting, with a user-facing explanation.
    Config(String),
    ConfigFile(ConfigError),
    Topology(TopologyError),
    Traffic(TrafficError),
    Logging(LoggingError),
    Prediction(PredictionError),
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Topology(e) => write!(f, "Topology store error: {}", e),
            CliError::Traffic(e) => write!(f, "Traffic provider error: {}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Prediction(e) => write!(f, "Invalid request: {}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Topology(e) => Some(e),
            CliError::Traffic(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Prediction(e) => Some(e),
            CliError::Config(_) | CliError::Output(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<TopologyError> for CliError {
    fn from(e: TopologyError) -> Self {
        CliError::Topology(e)
    }
}

impl From<TrafficError> for CliError {
    fn from(e: TrafficError) -> Self {
        CliError::Traffic(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<PredictionError> for CliError {
    fn from(e: PredictionError) -> Self {
        CliError::Prediction(e)
    }
}
