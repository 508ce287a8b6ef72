//! Shared data types for brokerbench.

use crate::config::TargetOverrides;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Placeholder token -> literal replacement, one map per target.
pub type OverrideMap = BTreeMap<String, String>;

pub const NAME_TOKEN: &str = "__NAME__";
pub const BOOTSTRAP_SERVERS_TOKEN: &str = "__BOOTSTRAP_SERVERS__";

pub const DRIVER_TEMPLATES_DIR: &str = "driver-tmpls";
pub const WORKLOADS_DIR: &str = "workloads";

/// A discovered benchmark scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub driver_dir: PathBuf,
    pub workload_dir: PathBuf,
}

impl Scenario {
    pub fn new(root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir = root.join(&name);
        Self {
            driver_dir: dir.join(DRIVER_TEMPLATES_DIR),
            workload_dir: dir.join(WORKLOADS_DIR),
            name,
        }
    }
}

/// A driver configuration template; content is read at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverTemplate {
    pub name: String,
    pub path: PathBuf,
}

/// A workload file. Only ever referenced by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub name: String,
    pub path: PathBuf,
}

/// A file entry discovered in a scenario directory.
pub trait NamedFile {
    fn file_name(&self) -> &str;
}

impl NamedFile for DriverTemplate {
    fn file_name(&self) -> &str {
        &self.name
    }
}

impl NamedFile for Workload {
    fn file_name(&self) -> &str {
        &self.name
    }
}

/// One benchmarked endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// Subdirectory of the workspace holding this target's rendered drivers.
    pub dir_name: String,
    pub overrides: OverrideMap,
}

impl Target {
    pub fn new(
        name: impl Into<String>,
        dir_name: impl Into<String>,
        bootstrap_servers: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut overrides = OverrideMap::new();
        overrides.insert(NAME_TOKEN.to_string(), name.clone());
        overrides.insert(BOOTSTRAP_SERVERS_TOKEN.to_string(), bootstrap_servers.into());
        Self {
            name,
            dir_name: dir_name.into(),
            overrides,
        }
    }

    /// The reference broker.
    pub fn kafka(bootstrap_servers: impl Into<String>) -> Self {
        Self::new("kafka", "kafka", bootstrap_servers)
    }

    /// The Kafka-compatible reimplementation.
    pub fn hstream(bootstrap_servers: impl Into<String>) -> Self {
        Self::new("hstream-kafka", "hstream", bootstrap_servers)
    }

    /// Merge extra tokens; the built-in name and bootstrap tokens are kept.
    pub fn with_extra_overrides(mut self, extra: &TargetOverrides) -> Self {
        for (k, v) in &extra.extra_overrides {
            if k != NAME_TOKEN && k != BOOTSTRAP_SERVERS_TOKEN {
                self.overrides.insert(k.clone(), v.clone());
            }
        }
        self
    }
}

/// Optional exact-name filter. `None` selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter(Option<BTreeSet<String>>);

impl NameFilter {
    pub fn all() -> Self {
        Self(None)
    }

    /// An empty list means "no filter", matching how the CLI treats absent flags.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self(None)
        } else {
            Self(Some(set))
        }
    }

    pub fn is_all(&self) -> bool {
        self.0.is_none()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.0.as_ref().map_or(true, |set| set.contains(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flat_map(|set| set.iter().map(String::as_str))
    }

    /// Keep the entries whose file name is in the filter.
    ///
    /// Filter names that match nothing are ignored; they are returned so the
    /// caller can log them.
    pub fn apply<T: NamedFile>(&self, items: Vec<T>) -> (Vec<T>, Vec<String>) {
        let Some(set) = &self.0 else {
            return (items, Vec::new());
        };
        let unmatched = set
            .iter()
            .filter(|name| !items.iter().any(|i| i.file_name() == name.as_str()))
            .cloned()
            .collect();
        let kept = items
            .into_iter()
            .filter(|i| set.contains(i.file_name()))
            .collect();
        (kept, unmatched)
    }
}

/// User selection for a run.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Scenario names in run order; empty means every discovered scenario.
    pub scenarios: Vec<String>,
    pub drivers: NameFilter,
    pub workloads: NameFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> DriverTemplate {
        DriverTemplate {
            name: name.into(),
            path: PathBuf::from("/tmpls").join(name),
        }
    }

    #[test]
    fn filter_is_exact_and_case_sensitive() {
        let filter = NameFilter::from_names(["a.yaml", "B.yaml", "missing.yaml"]);
        let (kept, unmatched) =
            filter.apply(vec![template("a.yaml"), template("b.yaml"), template("c.yaml")]);
        let names: Vec<_> = kept.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a.yaml"]);
        assert_eq!(unmatched, vec!["B.yaml".to_string(), "missing.yaml".to_string()]);
    }

    #[test]
    fn empty_filter_selects_everything() {
        let filter = NameFilter::from_names(Vec::<String>::new());
        assert!(filter.is_all());
        let (kept, unmatched) = filter.apply(vec![template("a.yaml")]);
        assert_eq!(kept.len(), 1);
        assert!(unmatched.is_empty());
    }

    #[test]
    fn builtin_targets_carry_name_and_bootstrap_tokens() {
        let t = Target::hstream("127.0.0.1:9092");
        assert_eq!(t.dir_name, "hstream");
        assert_eq!(t.overrides[NAME_TOKEN], "hstream-kafka");
        assert_eq!(t.overrides[BOOTSTRAP_SERVERS_TOKEN], "127.0.0.1:9092");
    }

    #[test]
    fn extra_overrides_cannot_replace_builtin_tokens() {
        let mut extra = TargetOverrides::default();
        extra
            .extra_overrides
            .insert(NAME_TOKEN.into(), "other".into());
        extra
            .extra_overrides
            .insert("__ACKS__".into(), "all".into());
        let t = Target::kafka("k:9092").with_extra_overrides(&extra);
        assert_eq!(t.overrides[NAME_TOKEN], "kafka");
        assert_eq!(t.overrides["__ACKS__"], "all");
    }
}
