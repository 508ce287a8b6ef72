//! CLI for brokerbench - a comparative Kafka / HStream benchmark harness.

mod formatting;
mod progress;

use anyhow::{Context, Result};
use brokerbench_core::catalog::ScenarioCatalog;
use brokerbench_core::{Config, ConfigOverrides, NameFilter, Orchestrator, Selection, Target};
use clap::Parser;
use formatting::{print_run_summary, print_scenario_list};
use progress::ConsoleReporter;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "brokerbench",
    about = "Run the same benchmark scenarios against Kafka and HStream"
)]
struct Cli {
    /// Bootstrap servers of the Kafka cluster.
    #[arg(long, required_unless_present_any = ["list_scenarios", "show_config"])]
    kafka: Option<String>,

    /// Bootstrap servers of the HStream cluster.
    #[arg(long, required_unless_present_any = ["list_scenarios", "show_config"])]
    hstream: Option<String>,

    /// Only run these scenarios.
    #[arg(short, long = "scenario", num_args = 1..)]
    scenarios: Vec<String>,

    /// Only render these driver templates (by file name).
    #[arg(short, long = "driver", num_args = 1..)]
    drivers: Vec<String>,

    /// Only pass these workloads (by file name).
    #[arg(short, long = "workload", num_args = 1..)]
    workloads: Vec<String>,

    /// Root directory for per-scenario results [default: ./results].
    #[arg(short = 'o', long)]
    result_dir: Option<PathBuf>,

    /// Optional YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the scenarios.
    #[arg(long)]
    scenario_root: Option<PathBuf>,

    /// Benchmark executor program.
    #[arg(long)]
    executor: Option<PathBuf>,

    /// Kill the executor after this many seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Print the discovered scenarios and exit.
    #[arg(long)]
    list_scenarios: bool,

    /// Print the resolved configuration and exit.
    #[arg(long)]
    show_config: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = ConfigOverrides {
        scenario_root: cli.scenario_root.clone(),
        result_dir: cli.result_dir.clone(),
        executor: cli.executor.clone(),
        timeout_seconds: cli.timeout,
    };
    let config = Config::load(cli.config.as_deref(), overrides)?;

    if cli.show_config {
        let yaml = serde_yaml::to_string(&config)?;
        println!("{yaml}");
        return Ok(());
    }

    if cli.list_scenarios {
        let catalog = ScenarioCatalog::new(&config.scenario_root);
        let scenarios = catalog.list_scenarios()?;
        print_scenario_list(catalog.root(), &scenarios);
        return Ok(());
    }

    // clap enforces both when no listing flag is given.
    let kafka = cli.kafka.context("--kafka is required")?;
    let hstream = cli.hstream.context("--hstream is required")?;

    let targets = vec![
        Target::kafka(kafka).with_extra_overrides(&config.targets.kafka),
        Target::hstream(hstream).with_extra_overrides(&config.targets.hstream),
    ];
    let selection = Selection {
        scenarios: cli.scenarios,
        drivers: NameFilter::from_names(cli.drivers),
        workloads: NameFilter::from_names(cli.workloads),
    };

    let orchestrator =
        Orchestrator::new(&config, targets)?.with_reporter(Arc::new(ConsoleReporter::new()));

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(orchestrator.run(&selection))?;
    print_run_summary(&summary);

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
