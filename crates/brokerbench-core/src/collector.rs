//! Result artifact discovery and chart command construction.

use crate::error::{BenchError, Result};
use crate::runner::CommandLine;
use globwalk::{FileType, GlobWalkerBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ResultCollector {
    extension: String,
    chart_tool: PathBuf,
}

impl ResultCollector {
    pub fn new(extension: impl Into<String>, chart_tool: impl Into<PathBuf>) -> Self {
        Self {
            extension: extension.into(),
            chart_tool: chart_tool.into(),
        }
    }

    /// Files directly inside `output_dir` with the result extension, sorted.
    ///
    /// Subdirectories are not searched. A missing directory has no results.
    pub fn find_results(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        if !output_dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = format!("*.{}", self.extension);
        let walker = GlobWalkerBuilder::from_patterns(output_dir, &[pattern.as_str()])
            .max_depth(1)
            .file_type(FileType::FILE)
            .build()
            .map_err(|e| BenchError::Internal(e.into()))?;

        let mut results: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.into_path()),
                Err(e) => {
                    warn!(dir = %output_dir.display(), error = %e, "skipping unreadable result entry");
                    None
                }
            })
            .collect();
        results.sort();
        Ok(results)
    }

    /// `<chart-tool> -o <output dir> -r <artifact>...`, or `None` with no artifacts.
    ///
    /// The command is only built; running it is left to the user.
    pub fn chart_command(&self, output_dir: &Path, results: &[PathBuf]) -> Option<CommandLine> {
        if results.is_empty() {
            return None;
        }
        Some(
            CommandLine::new(&self.chart_tool)
                .arg("-o")
                .arg(output_dir.as_os_str())
                .arg("-r")
                .args(results.iter().map(|r| r.as_os_str())),
        )
    }
}
