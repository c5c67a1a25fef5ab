//! Routes command - list the stored network.

use shuttlecast::topology::{Topology, TopologyStore};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the routes command.
pub fn run(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("routes");
    let topology = runner.topology_store().load_topology()?;

    if topology.routes().next().is_none() {
        println!("No routes stored. Run 'shuttlecast seed' first.");
        return Ok(());
    }

    print!("{}", render_routes(&topology));
    Ok(())
}

fn render_routes(topology: &Topology) -> String {
    let mut out = String::new();
    for route in topology.routes() {
        out.push_str(&format!(
            "{:>4}  {:<24} {:<8} {:>5.1} km  {}\n",
            route.id,
            route.name,
            route.direction,
            route.distance_km,
            topology.stop_names(route).join(" -> ")
        ));
    }

    let unused = topology.unused_stops();
    if !unused.is_empty() {
        let ids: Vec<String> = unused.iter().map(|id| id.to_string()).collect();
        out.push_str(&format!("\nStops not on any route: {}\n", ids.join(", ")));
    }
    out
}
