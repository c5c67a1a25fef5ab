//! Shuttlecast CLI - Command-line interface
//!
//! Seeds the campus network, manages settings and prints live delay
//! predictions for a shuttle on a chosen route leg.

mod commands;
mod error;
mod runner;

use std::process;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::predict::PredictArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "shuttlecast")]
#[command(version, about = "Live arrival delay prediction for campus shuttles", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the configuration file with default settings
    Init,

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Store the demo campus network (stops and routes)
    Seed {
        /// Replace any stored network with the demo one
        #[arg(long)]
        force_demo: bool,
    },

    /// List stored routes
    Routes,

    /// Simulate a shuttle on a route leg and predict its arrival delay
    Predict {
        /// Route ID (default: 103)
        #[arg(short, long)]
        route: Option<u32>,

        /// Leg index along the route, starting at 0
        #[arg(short, long, default_value_t = 0)]
        leg: usize,

        /// Passenger count (default: random 60-80)
        #[arg(short, long, allow_negative_numbers = true)]
        passengers: Option<i64>,

        /// Minutes until the scheduled arrival at the next stop (default: 15)
        #[arg(long, allow_negative_numbers = true)]
        scheduled_in: Option<i64>,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,

        /// Google Maps API key (overrides config and environment)
        #[arg(long)]
        google_api_key: Option<String>,

        /// Traffic request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
        Commands::Seed { force_demo } => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::seed::run(&runner, force_demo)
        }
        Commands::Routes => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::routes::run(&runner)
        }
        Commands::Predict {
            route,
            leg,
            passengers,
            scheduled_in,
            json,
            google_api_key,
            timeout,
        } => {
            let runner = CliRunner::new(cli.verbose)?;
            commands::predict::run(
                &runner,
                PredictArgs {
                    route,
                    leg,
                    passengers,
                    scheduled_in,
                    json,
                    google_api_key,
                    timeout,
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from([
            "shuttlecast",
            "predict",
            "--route",
            "201",
            "--leg",
            "1",
            "--scheduled-in",
            "-5",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Predict {
                route,
                leg,
                scheduled_in,
                json,
                passengers,
                ..
            } => {
                assert_eq!(route, Some(201));
                assert_eq!(leg, 1);
                assert_eq!(scheduled_in, Some(-5));
                assert!(json);
                assert_eq!(passengers, None);
            }
            other => panic!("Expected predict, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_predict_negative_passengers_reaches_validation() {
        let cli = Cli::try_parse_from(["shuttlecast", "predict", "--passengers", "-3"]).unwrap();
        match cli.command {
            Commands::Predict { passengers, .. } => assert_eq!(passengers, Some(-3)),
            other => panic!("Expected predict, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_seed_and_config() {
        let cli = Cli::try_parse_from(["shuttlecast", "-v", "seed", "--force-demo"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Seed { force_demo: true }));

        let cli = Cli::try_parse_from(["shuttlecast", "config", "get", "traffic.timeout"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Get { .. }
            }
        ));
    }
}
