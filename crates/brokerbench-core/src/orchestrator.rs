//! Sequential orchestration: render drivers, run the executor, collect results.
//!
//! Each scenario walks `Setup -> Render -> Execute -> Collect -> Teardown`.
//! The workspace holding rendered drivers is removed in teardown whatever
//! happened before it. The first failing scenario stops the run.

use crate::catalog::ScenarioCatalog;
use crate::collector::ResultCollector;
use crate::config::Config;
use crate::error::{BenchError, Result};
use crate::render::TemplateRenderer;
use crate::reporter::{NullReporter, ProgressEvent, ProgressReporter};
use crate::runner::{executor_command, CommandLine, ExecutorRunner};
use crate::state::{ScenarioPhase, ScenarioState};
use crate::types::{Scenario, Selection, Target};
use crate::workspace::{WorkspaceLayout, WorkspaceManager};
use anyhow::anyhow;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of one successful scenario.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario: String,
    pub output_dir: PathBuf,
    /// Rendered drivers across all targets. They are gone once the report exists.
    pub rendered_drivers: usize,
    pub workloads: Vec<PathBuf>,
    pub executor_command: CommandLine,
    pub results: Vec<PathBuf>,
    /// Built when results exist; never run.
    pub chart_command: Option<CommandLine>,
    pub started_at: String,
    pub duration: Duration,
}

/// Result of a run in which every scenario succeeded.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub scenarios: Vec<ScenarioReport>,
}

impl RunSummary {
    pub fn total_results(&self) -> usize {
        self.scenarios.iter().map(|s| s.results.len()).sum()
    }
}

struct PhaseOutput {
    rendered_drivers: usize,
    workloads: Vec<PathBuf>,
    executor_command: CommandLine,
    results: Vec<PathBuf>,
    chart_command: Option<CommandLine>,
}

pub struct Orchestrator {
    catalog: ScenarioCatalog,
    targets: Vec<(Target, TemplateRenderer)>,
    result_dir: PathBuf,
    executor: PathBuf,
    workspaces: WorkspaceManager,
    runner: ExecutorRunner,
    collector: ResultCollector,
    reporter: Arc<dyn ProgressReporter>,
}

impl Orchestrator {
    pub fn new(config: &Config, targets: Vec<Target>) -> Result<Self> {
        let targets = targets
            .into_iter()
            .map(|t| {
                let renderer = TemplateRenderer::new(t.overrides.clone())?;
                Ok((t, renderer))
            })
            .collect::<Result<Vec<_>>>()?;
        let timeout = config.executor_timeout()?;

        Ok(Self {
            catalog: ScenarioCatalog::new(&config.scenario_root),
            targets,
            result_dir: config.result_dir.clone(),
            executor: config.executor.clone(),
            workspaces: WorkspaceManager::new(config.workspace_parent.clone()),
            runner: ExecutorRunner::new(timeout),
            collector: ResultCollector::new(&config.result_extension, &config.chart_tool),
            reporter: Arc::new(NullReporter),
        })
    }

    /// Set a custom progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Run the selected scenarios one after another, stopping at the first failure.
    pub async fn run(&self, selection: &Selection) -> Result<RunSummary> {
        let started = Instant::now();
        let scenarios = self.catalog.select_scenarios(&selection.scenarios)?;

        self.reporter.report(ProgressEvent::RunStarted {
            scenarios: scenarios.iter().map(|s| s.name.clone()).collect(),
        });
        info!(count = scenarios.len(), "starting run");

        let mut summary = RunSummary::default();
        for scenario in &scenarios {
            let report = self.run_scenario(scenario, selection).await?;
            summary.scenarios.push(report);
        }

        self.reporter.report(ProgressEvent::RunCompleted {
            scenarios: summary.scenarios.len(),
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        });
        Ok(summary)
    }

    /// Drive one scenario to completion.
    pub async fn run_scenario(
        &self,
        scenario: &Scenario,
        selection: &Selection,
    ) -> Result<ScenarioReport> {
        let started = Instant::now();
        let started_at = Utc::now().to_rfc3339();
        let output_dir = self.result_dir.join(&scenario.name);
        let mut state = ScenarioState::new(&scenario.name);

        self.reporter.report(ProgressEvent::ScenarioStarted {
            scenario: scenario.name.clone(),
            output_dir: output_dir.clone(),
        });
        info!(scenario = %scenario.name, output = %output_dir.display(), "scenario started");

        let out = output_dir.as_path();
        let outcome = match prepare_output_dir(out) {
            Ok(()) => {
                let targets: Vec<Target> = self.targets.iter().map(|(t, _)| t.clone()).collect();
                let state = &mut state;
                self.workspaces
                    .with_workspace(&targets, |layout| async move {
                        self.run_phases(state, scenario, selection, &layout, out)
                            .await
                    })
                    .await
            }
            Err(e) => Err(e),
        };

        if outcome.is_err() {
            state.fail();
        }
        self.enter(&mut state, ScenarioPhase::Teardown);
        let terminal = state.outcome();
        self.enter(&mut state, terminal);

        match outcome {
            Ok(phases) => {
                let duration = started.elapsed();
                self.reporter.report(ProgressEvent::ScenarioCompleted {
                    scenario: scenario.name.clone(),
                    results: phases.results.len(),
                    duration_ms: duration.as_secs_f64() * 1000.0,
                });
                Ok(ScenarioReport {
                    scenario: scenario.name.clone(),
                    output_dir,
                    rendered_drivers: phases.rendered_drivers,
                    workloads: phases.workloads,
                    executor_command: phases.executor_command,
                    results: phases.results,
                    chart_command: phases.chart_command,
                    started_at,
                    duration,
                })
            }
            Err(e) => {
                let phase = state.failed_in().unwrap_or(ScenarioPhase::Setup);
                warn!(scenario = %scenario.name, %phase, error = %e, "scenario failed");
                self.reporter.report(ProgressEvent::ScenarioFailed {
                    scenario: scenario.name.clone(),
                    phase,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_phases(
        &self,
        state: &mut ScenarioState,
        scenario: &Scenario,
        selection: &Selection,
        layout: &WorkspaceLayout,
        output_dir: &Path,
    ) -> Result<PhaseOutput> {
        self.enter(state, ScenarioPhase::Render);
        // Discover both directories up front so a broken scenario fails before rendering.
        let templates = self.catalog.list_driver_templates(scenario)?;
        let workloads = self.catalog.list_workloads(scenario)?;

        let (templates, unmatched) = selection.drivers.apply(templates);
        if !unmatched.is_empty() {
            debug!(scenario = %scenario.name, ?unmatched, "driver filter names matched nothing");
        }

        let mut drivers = Vec::new();
        for (target, renderer) in &self.targets {
            let target_dir = layout.target_dir(&target.name).ok_or_else(|| {
                BenchError::Internal(anyhow!("workspace has no directory for {}", target.name))
            })?;
            let driver_dir = target_dir.join(&scenario.name).join("drivers");
            let rendered = renderer.render(&templates, &driver_dir)?;
            self.reporter.report(ProgressEvent::DriversRendered {
                scenario: scenario.name.clone(),
                target: target.name.clone(),
                count: rendered.len(),
            });
            drivers.extend(rendered);
        }

        self.enter(state, ScenarioPhase::Execute);
        let (workloads, unmatched) = selection.workloads.apply(workloads);
        if !unmatched.is_empty() {
            debug!(scenario = %scenario.name, ?unmatched, "workload filter names matched nothing");
        }
        let workloads: Vec<PathBuf> = workloads.into_iter().map(|w| w.path).collect();

        let command = executor_command(&self.executor, &drivers, output_dir, &workloads);
        self.reporter.report(ProgressEvent::ExecutorStarted {
            scenario: scenario.name.clone(),
            command: command.clone(),
        });
        info!(scenario = %scenario.name, %command, "running executor");
        self.runner.run(&scenario.name, &command).await?;

        self.enter(state, ScenarioPhase::Collect);
        let results = self.collector.find_results(output_dir)?;
        let chart_command = self.collector.chart_command(output_dir, &results);
        if let Some(chart) = &chart_command {
            self.reporter.report(ProgressEvent::ChartCommandReady {
                scenario: scenario.name.clone(),
                command: chart.clone(),
            });
        } else {
            info!(scenario = %scenario.name, "no result artifacts found");
        }

        Ok(PhaseOutput {
            rendered_drivers: drivers.len(),
            workloads,
            executor_command: command,
            results,
            chart_command,
        })
    }

    fn enter(&self, state: &mut ScenarioState, to: ScenarioPhase) {
        let from = state.transition(to);
        debug!(scenario = %state.scenario, %from, %to, "phase change");
        self.reporter.report(ProgressEvent::PhaseChanged {
            scenario: state.scenario.clone(),
            from,
            to,
        });
    }
}

/// Create the output directory if needed. Existing contents are left alone.
fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| BenchError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}
