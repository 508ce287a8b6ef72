//! Unified error type for the harness.
//!
//! Every fatal condition aborts the scenario being processed and is propagated to
//! the caller unchanged. Absence of result artifacts is not an error.

use crate::config::ConfigError;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    /// An expected scenario directory is missing or unreadable.
    #[error("{what} not found at {}", path.display())]
    NotFound {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown scenario '{name}' (available: {})", available.join(", "))]
    UnknownScenario { name: String, available: Vec<String> },

    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid override token: {0}")]
    InvalidToken(String),

    #[error("failed to prepare workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("executor failed for scenario '{scenario}': {status}")]
    ExecutorFailed { scenario: String, status: ExitStatus },

    #[error("executor for scenario '{scenario}' timed out after {seconds}s")]
    Timeout { scenario: String, seconds: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BenchError {
    pub(crate) fn not_found(what: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::NotFound {
            what,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn render(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Render {
            path: path.into(),
            source,
        }
    }

    /// Discovery failures: the scenario tree is missing or a name is unknown.
    pub fn is_discovery(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::UnknownScenario { .. })
    }

    /// Failures of the external executor (launch, exit status, timeout).
    pub fn is_execution(&self) -> bool {
        matches!(
            self,
            Self::Launch { .. } | Self::ExecutorFailed { .. } | Self::Timeout { .. }
        )
    }
}
