//! Executor process management: build the benchmark command and wait for it.
//!
//! The executor is invoked with an argument vector, never through a shell, so
//! paths with spaces or shell metacharacters pass through untouched. It inherits
//! the harness's stdout and stderr for the duration of the run.

use crate::error::{BenchError, Result};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

/// A program plus its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Shell-like rendering for display only; never parsed back.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:,=+@%".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Build the executor invocation:
/// `<executor> -d <driver,driver,...> -od <output dir> <workload>...`
pub fn executor_command(
    executor: &Path,
    drivers: &[PathBuf],
    output_dir: &Path,
    workloads: &[PathBuf],
) -> CommandLine {
    let mut joined = OsString::new();
    for (i, d) in drivers.iter().enumerate() {
        if i > 0 {
            joined.push(",");
        }
        joined.push(d.as_os_str());
    }

    CommandLine::new(executor)
        .arg("-d")
        .arg(joined)
        .arg("-od")
        .arg(output_dir.as_os_str())
        .args(workloads.iter().map(|w| w.as_os_str()))
}

/// Runs the external benchmark executor for one scenario.
#[derive(Debug, Clone, Default)]
pub struct ExecutorRunner {
    timeout: Option<Duration>,
}

impl ExecutorRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Run `command` to completion, failing on launch error, non-zero exit or timeout.
    pub async fn run(&self, scenario: &str, command: &CommandLine) -> Result<ExitStatus> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| BenchError::Launch {
            program: command.program.clone(),
            source,
        })?;

        let status = match self.timeout {
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!(scenario, "executor timed out, killing it");
                    if let Err(e) = child.kill().await {
                        warn!(scenario, error = %e, "failed to kill executor");
                    }
                    return Err(BenchError::Timeout {
                        scenario: scenario.to_string(),
                        seconds: limit.as_secs_f64(),
                    });
                }
            },
            None => child.wait().await?,
        };

        info!(scenario, %status, "executor finished");
        if !status.success() {
            return Err(BenchError::ExecutorFailed {
                scenario: scenario.to_string(),
                status,
            });
        }
        Ok(status)
    }
}
