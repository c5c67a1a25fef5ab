//! Seed command - write the demo campus network to the topology store.

use shuttlecast::demo;
use shuttlecast::topology::TopologyStore;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the seed command.
///
/// With `force_demo`, the existing topology file is removed first so the
/// demo network replaces whatever was stored.
pub fn run(runner: &CliRunner, force_demo: bool) -> Result<(), CliError> {
    runner.log_startup("seed");
    let store = runner.topology_store();

    if force_demo {
        store.clear()?;
    }

    let report = store.save_if_absent(&demo::stops(), &demo::routes())?;

    println!("Topology file: {}", store.path().display());
    if report.wrote_anything() {
        println!("  Stops written:  {}", report.stops_written);
        println!("  Routes written: {}", report.routes_written);
    } else {
        println!("  Already seeded, nothing written.");
        println!("  Use --force-demo to replace it with the demo network.");
    }

    Ok(())
}
