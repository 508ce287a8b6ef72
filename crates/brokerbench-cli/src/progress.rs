//! Console reporter for the CLI.
//!
//! Prints run progress to stdout as events arrive. Command lines are shown in
//! cyan so they can be copied and re-run by hand.

use brokerbench_core::reporter::{ProgressEvent, ProgressReporter};
use console::style;

#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { scenarios } => {
                println!(
                    "{} Running {} scenario(s): {}",
                    style("→").cyan().bold(),
                    scenarios.len(),
                    scenarios.join(", ")
                );
            }
            ProgressEvent::ScenarioStarted {
                scenario,
                output_dir,
            } => {
                println!();
                println!(
                    "{} Scenario {} (results in {})",
                    style("→").cyan().bold(),
                    style(&scenario).bold(),
                    output_dir.display()
                );
            }
            ProgressEvent::DriversRendered {
                target, count, ..
            } => {
                println!("  rendered {count} driver(s) for {target}");
            }
            ProgressEvent::ExecutorStarted { command, .. } => {
                println!("{}", style(format!("Run command: {command}")).cyan());
            }
            ProgressEvent::ChartCommandReady { command, .. } => {
                println!("{}", style(format!("Chart command: {command}")).cyan());
            }
            ProgressEvent::ScenarioCompleted {
                scenario,
                results,
                duration_ms,
            } => {
                println!(
                    "{} {} finished in {:.1}s with {} result file(s)",
                    style("✓").green().bold(),
                    scenario,
                    duration_ms / 1000.0,
                    results
                );
            }
            ProgressEvent::ScenarioFailed {
                scenario,
                phase,
                error,
            } => {
                eprintln!(
                    "{} {} failed during {}: {}",
                    style("✗").red().bold(),
                    scenario,
                    phase,
                    error
                );
            }
            ProgressEvent::RunCompleted {
                scenarios,
                duration_ms,
            } => {
                println!();
                println!(
                    "{} {} scenario(s) completed in {:.1}s",
                    style("✓").green().bold(),
                    scenarios,
                    duration_ms / 1000.0
                );
            }
            // Phase changes go to the tracing log only.
            ProgressEvent::PhaseChanged { .. } => {}
        }
    }
}
