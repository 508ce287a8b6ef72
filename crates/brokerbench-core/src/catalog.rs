//! Scenario discovery over the `<root>/<scenario>/{driver-tmpls,workloads}` layout.

use crate::error::{BenchError, Result};
use crate::types::{DriverTemplate, Scenario, Workload};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    root: PathBuf,
}

impl ScenarioCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of all scenarios, one per subdirectory of the root, sorted.
    pub fn list_scenarios(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .map_err(|e| BenchError::not_found("scenario root", &self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            // Follow symlinks so linked scenario directories are discovered.
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = utf8_name(&entry) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn scenario(&self, name: &str) -> Scenario {
        Scenario::new(&self.root, name)
    }

    /// Resolve the user's scenario selection.
    ///
    /// An empty selection means every scenario. Otherwise names are kept in the
    /// order given, duplicates dropped, and any unknown name is an error.
    pub fn select_scenarios(&self, requested: &[String]) -> Result<Vec<Scenario>> {
        let available = self.list_scenarios()?;
        if requested.is_empty() {
            return Ok(available.iter().map(|n| self.scenario(n)).collect());
        }

        let mut selected: Vec<Scenario> = Vec::with_capacity(requested.len());
        for name in requested {
            if !available.contains(name) {
                return Err(BenchError::UnknownScenario {
                    name: name.clone(),
                    available,
                });
            }
            if !selected.iter().any(|s| &s.name == name) {
                selected.push(self.scenario(name));
            }
        }
        Ok(selected)
    }

    pub fn list_driver_templates(&self, scenario: &Scenario) -> Result<Vec<DriverTemplate>> {
        list_files(&scenario.driver_dir, "driver template directory").map(|files| {
            files
                .into_iter()
                .map(|(name, path)| DriverTemplate { name, path })
                .collect()
        })
    }

    pub fn list_workloads(&self, scenario: &Scenario) -> Result<Vec<Workload>> {
        list_files(&scenario.workload_dir, "workload directory").map(|files| {
            files
                .into_iter()
                .map(|(name, path)| Workload { name, path })
                .collect()
        })
    }
}

/// Regular files directly under `dir`, sorted by name.
fn list_files(dir: &Path, what: &'static str) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| BenchError::not_found(what, dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        // Follow symlinks so linked templates still count as files.
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = utf8_name(&entry) {
            files.push((name, path));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// The entry's name, or `None` (with a warning) when it is not valid UTF-8.
///
/// Names are substituted into paths and matched against CLI filters, so a lossy
/// conversion would point at a file that does not exist.
fn utf8_name(entry: &fs::DirEntry) -> Option<String> {
    match entry.file_name().into_string() {
        Ok(name) => Some(name),
        Err(raw) => {
            warn!(path = %entry.path().display(), name = ?raw, "skipping entry with non-UTF-8 name");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_root_is_not_found() {
        let dir = tempdir().unwrap();
        let catalog = ScenarioCatalog::new(dir.path().join("nope"));
        let err = catalog.list_scenarios().unwrap_err();
        assert!(err.is_discovery());
        assert!(err.to_string().contains("scenario root not found"));
    }

    #[test]
    fn plain_files_in_root_are_not_scenarios() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("s1")).unwrap();
        fs::write(dir.path().join("README.md"), "x").unwrap();
        let catalog = ScenarioCatalog::new(dir.path());
        assert_eq!(catalog.list_scenarios().unwrap(), vec!["s1".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_scenario_directory_is_listed() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real-s");
        fs::create_dir(&real).unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&real, root.join("linked")).unwrap();

        let catalog = ScenarioCatalog::new(&root);
        assert_eq!(catalog.list_scenarios().unwrap(), vec!["linked".to_string()]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("ok")).unwrap();
        fs::create_dir(dir.path().join(OsStr::from_bytes(b"bad-\xff"))).unwrap();

        let catalog = ScenarioCatalog::new(dir.path());
        assert_eq!(catalog.list_scenarios().unwrap(), vec!["ok".to_string()]);

        let tmpls = dir.path().join("ok").join("driver-tmpls");
        fs::create_dir(&tmpls).unwrap();
        fs::write(tmpls.join("driver.yaml"), "x").unwrap();
        fs::write(tmpls.join(OsStr::from_bytes(b"\xfe.yaml")), "x").unwrap();

        let templates = catalog
            .list_driver_templates(&catalog.scenario("ok"))
            .unwrap();
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["driver.yaml"]);
    }
}
