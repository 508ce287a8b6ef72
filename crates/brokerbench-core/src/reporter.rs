//! Progress reporting trait and types for benchmark runs.
//!
//! The orchestrator never prints; it hands every user-facing event to the
//! reporter it was built with.

use crate::runner::CommandLine;
use crate::state::ScenarioPhase;
use parking_lot::Mutex;
use std::path::PathBuf;

/// Events emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Run started with the scenarios it will process, in order.
    RunStarted { scenarios: Vec<String> },
    ScenarioStarted {
        scenario: String,
        output_dir: PathBuf,
    },
    PhaseChanged {
        scenario: String,
        from: ScenarioPhase,
        to: ScenarioPhase,
    },
    /// Drivers rendered for one target.
    DriversRendered {
        scenario: String,
        target: String,
        count: usize,
    },
    /// The executor is about to run.
    ExecutorStarted {
        scenario: String,
        command: CommandLine,
    },
    /// Results were found; this is the command that would chart them.
    ChartCommandReady {
        scenario: String,
        command: CommandLine,
    },
    ScenarioCompleted {
        scenario: String,
        results: usize,
        duration_ms: f64,
    },
    ScenarioFailed {
        scenario: String,
        phase: ScenarioPhase,
        error: String,
    },
    /// Run finished; only emitted when every scenario succeeded.
    RunCompleted {
        scenarios: usize,
        duration_ms: f64,
    },
}

/// Trait for progress reporters.
///
/// Implementors receive events during a run and can display progress,
/// log to file, etc.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// A no-op reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    /// Commands reported for execution, in order.
    pub fn executor_commands(&self) -> Vec<CommandLine> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::ExecutorStarted { command, .. } => Some(command.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for MemoryReporter {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().push(event);
    }
}
