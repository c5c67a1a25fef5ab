//! `shuttlecast config` - read and edit `config.ini` one key at a time.
//!
//! Keys are addressed as `section.key`, e.g. `prediction.grace_minutes`.
//! Every write goes through [`ConfigKey::set`], so values are validated the
//! same way as when the file is loaded.

use std::fmt::Write as _;

use clap::Subcommand;
use shuttlecast::config::{config_file_path, ConfigError, ConfigFile, ConfigKey};

use crate::error::CliError;

const UNSET: &str = "(not set)";

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of one setting
    Get {
        /// Setting name, e.g. traffic.timeout
        key: String,
    },

    /// Change one setting and save the file
    Set {
        /// Setting name, e.g. prediction.grace_minutes
        key: String,

        /// New value
        value: String,
    },

    /// Restore one setting to its built-in default
    Reset {
        /// Setting name, e.g. heuristic.max_capacity
        key: String,
    },

    /// Print every setting grouped by section
    List,

    /// Print where config.ini lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => println!("{}", config_file_path().display()),
        ConfigCommands::List => print!("{}", render_settings(&ConfigFile::load()?)),
        ConfigCommands::Get { key } => {
            let key = lookup(&key)?;
            let config = ConfigFile::load()?;
            println!("{}", shown(&key.get(&config)));
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup(&key)?;
            let mut config = ConfigFile::load()?;
            key.set(&mut config, &value)?;
            config.save()?;
            println!("{} = {}", key.name(), shown(&key.get(&config)));
        }
        ConfigCommands::Reset { key } => {
            let key = lookup(&key)?;
            let mut config = ConfigFile::load()?;
            reset(key, &mut config)?;
            config.save()?;
            println!("{} reset to {}", key.name(), shown(&key.get(&config)));
        }
    }
    Ok(())
}

fn lookup(name: &str) -> Result<ConfigKey, CliError> {
    name.parse().map_err(|_| {
        CliError::Config(format!(
            "No setting named '{}'. Run 'shuttlecast config list' for the full set.",
            name
        ))
    })
}

/// Writes the default value of `key` back into `config`.
fn reset(key: ConfigKey, config: &mut ConfigFile) -> Result<(), ConfigError> {
    key.set(config, &key.get(&ConfigFile::default()))
}

/// INI-like listing: one `[section]` header per group, blank line between.
fn render_settings(config: &ConfigFile) -> String {
    let mut out = String::new();
    let mut section = None;

    for key in ConfigKey::all() {
        if section != Some(key.section()) {
            if section.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", key.section());
            section = Some(key.section());
        }
        let _ = writeln!(out, "{} = {}", key.key_name(), shown(&key.get(config)));
    }

    out
}

fn shown(value: &str) -> &str {
    if value.is_empty() {
        UNSET
    } else {
        value
    }
}
