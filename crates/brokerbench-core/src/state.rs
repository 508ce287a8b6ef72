//! Scenario state management.
//!
//! Provides explicit state tracking for one scenario iteration with checked
//! transitions: `Setup -> Render -> Execute -> Collect -> Teardown -> Completed`.
//! Any phase before teardown may fail; teardown still runs and the scenario
//! then ends `Failed`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPhase {
    Setup,
    Render,
    Execute,
    Collect,
    Teardown,
    Completed,
    Failed,
}

impl ScenarioPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    fn can_transition_to(self, to: Self) -> bool {
        use ScenarioPhase::*;
        matches!(
            (self, to),
            (Setup, Render)
                | (Render, Execute)
                | (Execute, Collect)
                | (Setup | Render | Execute | Collect, Teardown)
                | (Teardown, Completed | Failed)
        )
    }
}

impl fmt::Display for ScenarioPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Setup => "setup",
            Self::Render => "render",
            Self::Execute => "execute",
            Self::Collect => "collect",
            Self::Teardown => "teardown",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Tracks the phase of one scenario iteration.
#[derive(Debug)]
pub struct ScenarioState {
    pub scenario: String,
    phase: ScenarioPhase,
    failed_in: Option<ScenarioPhase>,
}

impl ScenarioState {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            phase: ScenarioPhase::Setup,
            failed_in: None,
        }
    }

    pub fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// The phase that failed, if any.
    pub fn failed_in(&self) -> Option<ScenarioPhase> {
        self.failed_in
    }

    /// Move to `to`, returning the previous phase.
    ///
    /// Panics on an illegal transition: that is a bug in the orchestrator.
    pub fn transition(&mut self, to: ScenarioPhase) -> ScenarioPhase {
        assert!(
            self.phase.can_transition_to(to),
            "illegal scenario transition {} -> {}",
            self.phase,
            to
        );
        std::mem::replace(&mut self.phase, to)
    }

    /// Record a failure in the current phase.
    pub fn fail(&mut self) {
        if self.failed_in.is_none() {
            self.failed_in = Some(self.phase);
        }
    }

    /// The terminal phase once teardown is done.
    pub fn outcome(&self) -> ScenarioPhase {
        if self.failed_in.is_some() {
            ScenarioPhase::Failed
        } else {
            ScenarioPhase::Completed
        }
    }
}
