//! Command-line front end for the courier planner.
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use courier_planner::catalog::{ADDRESS_CHOICES, DEFAULT_COURIERS, default_addresses};
use courier_planner::decoding::DecodeError;
use courier_planner::directions::{DirectionsClient, DirectionsConfig};
use courier_planner::map::MapError;
use courier_planner::pipeline::{PlanError, PlanningRequest, plan_routes};
use courier_planner::service::{ServiceClient, ServiceConfig};
use courier_planner::solver::{PollOptions, SolverError, SolverKind, SolverParams};

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to build directions client: {0}")]
    DirectionsClient(#[source] reqwest::Error),
    #[error("failed to connect to optimization service: {0}")]
    Connect(#[source] SolverError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("failed to render map: {0}")]
    Map(#[from] MapError),
    #[error("failed to render graph: {0}")]
    Graph(#[from] DecodeError),
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SolverChoice {
    SimAnneal,
    Qa,
}

impl From<SolverChoice> for SolverKind {
    fn from(choice: SolverChoice) -> Self {
        match choice {
            SolverChoice::SimAnneal => SolverKind::SimulatedAnnealing,
            SolverChoice::Qa => SolverKind::QuantumAnnealing,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "courier-planner",
    about = "Plan delivery routes for a fleet of couriers",
    version
)]
struct Cli {
    /// Number of couriers (one route each).
    #[arg(long, short = 'c', default_value_t = DEFAULT_COURIERS,
          value_parser = clap::value_parser!(u32).range(1..))]
    couriers: u32,
    /// Delivery address; repeat for every stop. Defaults to the built-in selection.
    #[arg(long = "address", short = 'a', value_name = "ADDRESS")]
    addresses: Vec<String>,
    /// Print the built-in address choices and exit.
    #[arg(long)]
    list_addresses: bool,

    #[arg(long, value_enum, default_value_t = SolverChoice::SimAnneal)]
    solver: SolverChoice,
    #[arg(long, default_value_t = 300)]
    sweeps: u32,
    #[arg(long, default_value_t = 10_000)]
    annealing_reads: u32,
    #[arg(long, default_value_t = 1_000)]
    quantum_reads: u32,
    #[arg(long, default_value_t = 20)]
    annealing_time: u32,

    /// Google Maps API key.
    #[arg(long, env = "GCP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Optimization service endpoint.
    #[arg(long, env = "SERVICE_ENDPOINT", default_value = "http://localhost:8081")]
    endpoint: String,
    #[arg(long, env = "CONSUMER_KEY", hide_env_values = true)]
    consumer_key: Option<String>,
    #[arg(long, env = "CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: Option<String>,
    #[arg(long, env = "SERVICE_TOKEN_URL")]
    token_url: Option<String>,
    /// Seconds between job status checks.
    #[arg(long, default_value_t = 1)]
    poll_interval: u64,
    /// Seconds to wait for the job before giving up.
    #[arg(long, default_value_t = 300)]
    timeout: u64,

    /// Write the route map as a standalone HTML page.
    #[arg(long, value_name = "PATH")]
    map_html: Option<PathBuf>,
    /// Write the route map as GeoJSON.
    #[arg(long, value_name = "PATH")]
    geojson: Option<PathBuf>,
    /// Write the distance graph as Graphviz DOT.
    #[arg(long, value_name = "PATH")]
    graph_dot: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("courier-planner: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.list_addresses {
        for address in ADDRESS_CHOICES {
            println!("{address}");
        }
        return Ok(());
    }

    let addresses = if cli.addresses.is_empty() {
        default_addresses()
    } else {
        cli.addresses.clone()
    };

    let params = SolverParams::for_couriers(cli.couriers)
        .with_solver(cli.solver.into())
        .with_sweeps(cli.sweeps)
        .with_annealing_reads(cli.annealing_reads)
        .with_quantum_reads(cli.quantum_reads)
        .with_annealing_time(cli.annealing_time);
    let request = PlanningRequest::new(cli.couriers, addresses).with_params(params);

    let directions = DirectionsClient::new(DirectionsConfig {
        api_key: cli.api_key.clone().filter(|key| !key.is_empty()),
        ..DirectionsConfig::default()
    })
    .map_err(CliError::DirectionsClient)?;

    let defaults = ServiceConfig::default();
    let service = ServiceClient::connect(ServiceConfig {
        endpoint: cli.endpoint.clone(),
        consumer_key: cli.consumer_key.clone(),
        consumer_secret: cli.consumer_secret.clone(),
        token_url: cli.token_url.clone().unwrap_or(defaults.token_url),
        timeout_secs: defaults.timeout_secs,
    })
    .map_err(CliError::Connect)?;

    let poll = PollOptions {
        interval: Duration::from_secs(cli.poll_interval),
        timeout: Duration::from_secs(cli.timeout),
    };

    let outcome = plan_routes(&request, &directions, &service, &poll)?;

    for warning in outcome.warnings() {
        eprintln!("warning: {warning}");
    }
    print!("{}", outcome.text());

    if cli.map_html.is_some() || cli.geojson.is_some() {
        let figure = outcome.map()?;
        if let Some(path) = &cli.map_html {
            write_file(path, &figure.to_html())?;
        }
        if let Some(path) = &cli.geojson {
            write_file(path, &figure.to_geojson().to_string())?;
        }
    }
    if let Some(path) = &cli.graph_dot {
        write_file(path, &outcome.graph()?.to_dot())?;
    }

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
