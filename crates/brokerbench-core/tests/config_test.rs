//! Tests for the config module.

use brokerbench_core::config::{interpolate_env_vars, Config, ConfigOverrides};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_env_interpolation_basic() {
    std::env::set_var("BB_TEST_VAR_123", "hello");
    let result = interpolate_env_vars("value: ${BB_TEST_VAR_123}");
    assert_eq!(result, "value: hello");
    std::env::remove_var("BB_TEST_VAR_123");
}

#[test]
fn test_env_interpolation_with_default() {
    std::env::remove_var("BB_NONEXISTENT_VAR_XYZ");
    let result = interpolate_env_vars("value: ${BB_NONEXISTENT_VAR_XYZ:-default_value}");
    assert_eq!(result, "value: default_value");
}

#[test]
fn test_env_interpolation_missing_no_default() {
    std::env::remove_var("BB_NONEXISTENT_VAR_ABC");
    let result = interpolate_env_vars("value: ${BB_NONEXISTENT_VAR_ABC}");
    assert_eq!(result, "value: ");
}

#[test]
fn load_without_file_uses_defaults() {
    let cfg = Config::load(None, ConfigOverrides::default()).unwrap();
    assert_eq!(cfg.result_dir, PathBuf::from("./results"));
    assert_eq!(cfg.executor, PathBuf::from("bin/benchmark"));
    assert_eq!(cfg.chart_tool, PathBuf::from("bin/create_charts.py"));
    assert_eq!(cfg.result_extension, "json");
    assert!(cfg.timeout_seconds.is_none());
    assert!(cfg.scenario_root.ends_with("hstream-kafka/scenarios"));
}

#[test]
fn load_reads_yaml_and_overrides_win() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
result_dir: /data/results
executor: /opt/omb/bin/benchmark
result_extension: ".json"
timeout_seconds: 600
targets:
  hstream:
    extra_overrides:
      __ACKS__: "1"
"#
    )
    .unwrap();

    let overrides = ConfigOverrides {
        result_dir: Some(PathBuf::from("/tmp/other")),
        ..Default::default()
    };
    let cfg = Config::load(Some(file.path()), overrides).unwrap();

    assert_eq!(cfg.result_dir, PathBuf::from("/tmp/other"));
    assert_eq!(cfg.executor, PathBuf::from("/opt/omb/bin/benchmark"));
    assert_eq!(cfg.result_extension, "json");
    assert_eq!(cfg.timeout_seconds, Some(600.0));
    assert_eq!(cfg.targets.hstream.extra_overrides["__ACKS__"], "1");
    assert!(cfg.targets.kafka.extra_overrides.is_empty());
}

#[test]
fn load_rejects_invalid_timeout() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timeout_seconds: -5").unwrap();

    let err = Config::load(Some(file.path()), ConfigOverrides::default()).unwrap_err();
    assert!(format!("{err}").contains("timeout_seconds must be positive"));
}

#[test]
fn load_rejects_timeout_too_large_for_duration() {
    let err = Config::load(
        None,
        ConfigOverrides {
            timeout_seconds: Some(1e30),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(format!("{err}").contains("timeout_seconds is too large"));
}

#[test]
fn load_missing_file_is_an_io_error() {
    let err = Config::load(
        Some(std::path::Path::new("/definitely/missing/brokerbench.yaml")),
        ConfigOverrides::default(),
    )
    .unwrap_err();
    assert!(format!("{err}").contains("failed to read config"));
}
