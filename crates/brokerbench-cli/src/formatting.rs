//! Output formatting for scenario listings and run summaries.

use brokerbench_core::RunSummary;
use std::path::Path;

pub fn print_scenario_list(root: &Path, scenarios: &[String]) {
    if scenarios.is_empty() {
        println!("No scenarios found under {}.", root.display());
        return;
    }

    println!("Scenarios under {}:", root.display());
    for name in scenarios {
        println!("  {name}");
    }
}

pub fn print_run_summary(summary: &RunSummary) {
    if summary.scenarios.is_empty() {
        println!("No scenarios were run.");
        return;
    }

    println!();
    println!(
        "{:<24} {:>8} {:>10} {:>8} {:>10}",
        "scenario", "drivers", "workloads", "results", "duration"
    );
    for report in &summary.scenarios {
        println!(
            "{:<24} {:>8} {:>10} {:>8} {:>9.1}s",
            report.scenario,
            report.rendered_drivers,
            report.workloads.len(),
            report.results.len(),
            report.duration.as_secs_f64()
        );
    }

    let charts: Vec<_> = summary
        .scenarios
        .iter()
        .filter_map(|r| r.chart_command.as_ref())
        .collect();
    if !charts.is_empty() {
        println!("\nTo chart the results:");
        for chart in charts {
            println!("  {chart}");
        }
    }
}
