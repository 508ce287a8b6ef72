//! Core library for brokerbench, a comparative Kafka / HStream benchmark harness.
//!
//! The harness does no measuring of its own. For every scenario it renders
//! per-target driver configurations from templates, hands them to an external
//! benchmark executor, and locates the result artifacts that executor wrote.
//!
//! - [`catalog`]: Scenario, driver template and workload discovery
//! - [`render`]: Single-pass placeholder substitution
//! - [`workspace`]: Ephemeral per-scenario directories with guaranteed cleanup
//! - [`runner`]: Executor invocation
//! - [`collector`]: Result artifact discovery and the chart command
//! - [`orchestrator`]: Sequential per-scenario pipeline
//! - [`state`]: Scenario phase machine
//! - [`reporter`]: Injectable progress reporting
//! - [`config`]: Layered configuration
//! - [`error`]: Unified error types

// Foundation modules
pub mod config;
pub mod error;
pub mod state;
pub mod types;

// Building blocks
pub mod catalog;
pub mod collector;
pub mod render;
pub mod reporter;
pub mod runner;
pub mod workspace;

// Execution
pub mod orchestrator;

pub use config::{Config, ConfigOverrides};
pub use error::{BenchError, Result};
pub use orchestrator::{Orchestrator, RunSummary, ScenarioReport};
pub use types::{NameFilter, Selection, Target};
