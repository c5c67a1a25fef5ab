//! Predict command - simulate a shuttle on a route leg and predict its delay.

use chrono::{Local, NaiveDateTime, TimeDelta};
use shuttlecast::demo;
use shuttlecast::model::{Route, RouteId, Stop};
use shuttlecast::predictor::{Prediction, PredictionRequest, TrafficStatus};
use shuttlecast::traffic::TrafficProvider;

use super::common::{ensure_topology, format_minutes, print_banner};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the predict command.
pub struct PredictArgs {
    pub route: Option<u32>,
    pub leg: usize,
    pub passengers: Option<i64>,
    pub scheduled_in: Option<i64>,
    pub json: bool,
    pub google_api_key: Option<String>,
    pub timeout: Option<u64>,
}

/// Inputs of one simulated prediction, kept for the report.
struct Scenario<'a> {
    route: &'a Route,
    from: &'a Stop,
    to: &'a Stop,
    passengers: u32,
    scheduled_arrival: NaiveDateTime,
}

/// Run the predict command.
pub fn run(runner: &CliRunner, args: PredictArgs) -> Result<(), CliError> {
    runner.log_startup("predict");

    let store = runner.topology_store();
    let topology = ensure_topology(&store)?;

    let route_id = args.route.map(RouteId).unwrap_or(demo::DEFAULT_ROUTE);
    let route = topology.route(route_id).ok_or_else(|| {
        CliError::Config(format!(
            "Route {} not found. Use 'shuttlecast routes' to list routes.",
            route_id
        ))
    })?;
    let (from, to) = topology.leg(route_id, args.leg)?.ok_or_else(|| {
        CliError::Config(format!(
            "Route {} has {} leg(s); --leg {} is out of range.",
            route_id,
            route.leg_count(),
            args.leg
        ))
    })?;

    let mut rng = rand::rng();

    // Stand-in for scraped history: fresh baselines for every route
    let baselines = runner.baseline_store();
    baselines.simulate(topology.route_ids(), &mut rng);

    let predictor = runner.create_predictor(args.google_api_key, args.timeout, baselines)?;

    let now = Local::now().naive_local();
    let scheduled_in = args
        .scheduled_in
        .unwrap_or(demo::DEFAULT_SCHEDULED_IN_MINUTES);
    let scheduled_arrival = scheduled_arrival(now, scheduled_in)?;
    let passengers = args
        .passengers
        .unwrap_or_else(|| i64::from(demo::simulated_passenger_count(&mut rng)));

    let location = demo::simulate_live_location(&from.location, &to.location, &mut rng);
    let request = PredictionRequest::from_raw(
        now,
        scheduled_arrival,
        location.as_tuple(),
        to.location.as_tuple(),
        route.id,
        passengers,
    )?;
    let scenario = Scenario {
        route,
        from,
        to,
        passengers: request.passenger_count,
        scheduled_arrival,
    };
    let prediction = predictor.predict(&request);

    if args.json {
        println!("{}", render_json(&scenario, &prediction)?);
    } else {
        print_report(&scenario, &prediction, predictor.provider().name());
    }

    Ok(())
}

/// `now` shifted by `minutes`, rejecting offsets outside the calendar range.
fn scheduled_arrival(now: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime, CliError> {
    TimeDelta::try_minutes(minutes)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| {
            CliError::Config(format!(
                "--scheduled-in {} minutes is out of range.",
                minutes
            ))
        })
}

fn render_json(scenario: &Scenario<'_>, prediction: &Prediction) -> Result<String, CliError> {
    let prediction =
        serde_json::to_value(prediction).map_err(|e| CliError::Output(e.to_string()))?;
    let value = serde_json::json!({
        "route_id": scenario.route.id.get(),
        "route_name": scenario.route.name,
        "from_stop": scenario.from.name,
        "next_stop": scenario.to.name,
        "passenger_count": scenario.passengers,
        "scheduled_arrival": scenario.scheduled_arrival.format("%Y-%m-%dT%H:%M:%S").to_string(),
        "prediction": prediction,
    });
    serde_json::to_string_pretty(&value).map_err(|e| CliError::Output(e.to_string()))
}

fn print_report(scenario: &Scenario<'_>, prediction: &Prediction, provider: &str) {
    let status = match prediction.traffic_status {
        TrafficStatus::Measured => "measured",
        TrafficStatus::Degraded => "unavailable",
    };
    let details = &prediction.details;

    print_banner("LIVE SHUTTLE DELAY PREDICTION");
    println!();
    println!("Route:       {} (ID: {})", scenario.route.name, scenario.route.id);
    println!("Between:     {} and {}", scenario.from.name, scenario.to.name);
    println!(
        "Next stop:   {} (scheduled {})",
        scenario.to.name,
        scenario.scheduled_arrival.format("%H:%M:%S")
    );
    println!("Passengers:  {}", scenario.passengers);
    println!("Traffic:     {} ({})", provider, status);
    println!();
    println!("Prediction:  {}", prediction.message);
    println!("Arrival:     {}", details.predicted_arrival.format("%H:%M:%S"));
    println!("  Live traffic delay:  {}", format_minutes(details.traffic_delay));
    println!("  Route baseline:      {}", format_minutes(details.route_baseline_delay));
    println!("  Time and crowding:   {}", format_minutes(details.heuristic_delay));
}
