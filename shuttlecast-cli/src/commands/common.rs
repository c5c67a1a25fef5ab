//! Common helpers shared across CLI commands.

use shuttlecast::demo;
use shuttlecast::topology::{Topology, TopologyStore};

use crate::error::CliError;

/// Width of the `=` rule under report titles.
const RULE_WIDTH: usize = 40;

/// Prints a title framed by `=` rules.
pub fn print_banner(title: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{}", title);
    println!("{}", "=".repeat(RULE_WIDTH));
}

/// Loads the topology, seeding the demo network first if the store is empty.
///
/// Seeding is idempotent, so calling this on every start is safe.
pub fn ensure_topology<S: TopologyStore>(store: &S) -> Result<Topology, CliError> {
    let report = store.save_if_absent(&demo::stops(), &demo::routes())?;
    if report.wrote_anything() {
        println!(
            "Seeded demo network ({} stops, {} routes)",
            report.stops_written, report.routes_written
        );
    }
    Ok(store.load_topology()?)
}

/// Formats minutes with one decimal, e.g. `3.4 min`.
pub fn format_minutes(minutes: f64) -> String {
    format!("{:.1} min", minutes)
}
