//! Init command - create the configuration file.

use shuttlecast::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() {
        println!("Configuration file already exists:");
        println!("  {}", path.display());
        println!();
        println!("Use 'shuttlecast config list' to view settings.");
        return Ok(());
    }

    let config = ConfigFile::default();
    config.save()?;

    println!("Configuration file: {}", path.display());
    println!("Topology file:      {}", config.topology.path.display());
    println!();
    println!("Live traffic is disabled until a Google Maps API key is set:");
    println!("  shuttlecast config set traffic.google_api_key <KEY>");
    println!();
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
