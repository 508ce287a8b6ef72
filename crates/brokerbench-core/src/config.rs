//! Configuration loading and models for brokerbench.
//!
//! Configuration is loaded via figment from multiple layers:
//! 1. Built-in defaults
//! 2. YAML file (optional)
//! 3. Environment variables (BROKERBENCH_ prefix, __ as nested separator)
//! 4. CLI overrides (passed programmatically)

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Figment(#[from] figment::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

const PROJECT_ROOT_ENV_VAR: &str = "PROJECT_ROOT";

// ============================================================================
// DEFAULTS (all in one place)
// ============================================================================

fn default_scenario_root() -> PathBuf {
    let root = std::env::var(PROJECT_ROOT_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    root.join("hstream-kafka").join("scenarios")
}

fn default_result_dir() -> PathBuf {
    PathBuf::from("./results")
}

fn default_executor() -> PathBuf {
    PathBuf::from("bin/benchmark")
}

fn default_chart_tool() -> PathBuf {
    PathBuf::from("bin/create_charts.py")
}

fn default_result_extension() -> String {
    "json".to_string()
}

// ============================================================================
// TARGET CONFIG
// ============================================================================

/// Extra placeholder substitutions for one target, on top of the built-in
/// `__NAME__` and `__BOOTSTRAP_SERVERS__` tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetOverrides {
    #[serde(default)]
    pub extra_overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default)]
    pub kafka: TargetOverrides,
    #[serde(default)]
    pub hstream: TargetOverrides,
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_scenario_root")]
    pub scenario_root: PathBuf,
    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,
    #[serde(default = "default_executor")]
    pub executor: PathBuf,
    #[serde(default = "default_chart_tool")]
    pub chart_tool: PathBuf,
    #[serde(default = "default_result_extension")]
    pub result_extension: String,
    /// Executor timeout; `None` waits indefinitely.
    #[serde(default)]
    pub timeout_seconds: Option<f64>,
    /// Parent directory for ephemeral workspaces; defaults to the system temp dir.
    #[serde(default)]
    pub workspace_parent: Option<PathBuf>,
    #[serde(default)]
    pub targets: TargetsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scenario_root: default_scenario_root(),
            result_dir: default_result_dir(),
            executor: default_executor(),
            chart_tool: default_chart_tool(),
            result_extension: default_result_extension(),
            timeout_seconds: None,
            workspace_parent: None,
            targets: TargetsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file plus environment and overrides.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = path {
            let contents = std::fs::read_to_string(path)?;
            let interpolated = interpolate_env_vars(&contents);
            figment = figment.merge(Yaml::string(&interpolated));
        }

        figment = figment
            .merge(Env::prefixed("BROKERBENCH_").split("__"))
            .merge(Serialized::defaults(overrides));

        let mut cfg: Config = figment.extract()?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// The executor timeout as a `Duration`, if one is configured.
    pub fn executor_timeout(&self) -> Result<Option<Duration>, ConfigError> {
        let Some(t) = self.timeout_seconds else {
            return Ok(None);
        };
        if !(t.is_finite() && t > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "timeout_seconds must be positive, got {t}"
            )));
        }
        Duration::try_from_secs_f64(t)
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("timeout_seconds is too large: {t}")))
    }

    fn normalize(&mut self) {
        if let Some(stripped) = self.result_extension.strip_prefix('.') {
            self.result_extension = stripped.to_string();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.executor.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("executor must not be empty".into()));
        }
        if self.result_extension.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "result_extension must not be empty".into(),
            ));
        }
        self.executor_timeout()?;
        let targets = [&self.targets.kafka, &self.targets.hstream];
        if targets
            .iter()
            .any(|t| t.extra_overrides.keys().any(|k| k.is_empty()))
        {
            return Err(ConfigError::Invalid(
                "override tokens must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// CLI OVERRIDES
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<f64>,
}

/// Expand `${VAR}` and `${VAR:-default}` references using the process environment.
pub fn interpolate_env_vars(input: &str) -> String {
    use once_cell::sync::Lazy;
    use regex::Regex;
    use std::env;

    static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("valid regex")
    });

    ENV_VAR_RE
        .replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default_val = caps.get(2).map(|m| m.as_str());
            match env::var(var_name) {
                Ok(val) => val,
                Err(_) => default_val.unwrap_or("").to_string(),
            }
        })
        .to_string()
}
