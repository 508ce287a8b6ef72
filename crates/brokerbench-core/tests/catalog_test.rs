//! Tests for scenario discovery.

use brokerbench_core::catalog::ScenarioCatalog;
use brokerbench_core::BenchError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn make_scenario(root: &Path, name: &str, templates: &[&str], workloads: &[&str]) {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("driver-tmpls")).unwrap();
    fs::create_dir_all(dir.join("workloads")).unwrap();
    for t in templates {
        fs::write(dir.join("driver-tmpls").join(t), "name: __NAME__").unwrap();
    }
    for w in workloads {
        fs::write(dir.join("workloads").join(w), "topics: 1").unwrap();
    }
}

#[test]
fn lists_one_scenario_per_subdirectory() {
    let dir = tempdir().unwrap();
    make_scenario(dir.path(), "throughput", &[], &[]);
    make_scenario(dir.path(), "latency", &[], &[]);

    let catalog = ScenarioCatalog::new(dir.path());
    assert_eq!(
        catalog.list_scenarios().unwrap(),
        vec!["latency".to_string(), "throughput".to_string()]
    );
}

#[test]
fn lists_exactly_the_files_in_each_directory() {
    let dir = tempdir().unwrap();
    make_scenario(
        dir.path(),
        "s1",
        &["kafka-throughput.yaml", "kafka-latency.yaml"],
        &["1-topic.yaml", "10-topics.yaml", "100-topics.yaml"],
    );
    // Nested directories are not templates.
    fs::create_dir_all(dir.path().join("s1/driver-tmpls/old")).unwrap();

    let catalog = ScenarioCatalog::new(dir.path());
    let scenario = catalog.scenario("s1");

    let templates: HashSet<String> = catalog
        .list_driver_templates(&scenario)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(
        templates,
        HashSet::from(["kafka-throughput.yaml".into(), "kafka-latency.yaml".into()])
    );

    let workloads = catalog.list_workloads(&scenario).unwrap();
    assert_eq!(workloads.len(), 3);
    for w in &workloads {
        assert_eq!(w.path, dir.path().join("s1/workloads").join(&w.name));
    }
}

#[test]
fn missing_subdirectory_is_a_discovery_error() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("broken/driver-tmpls")).unwrap();

    let catalog = ScenarioCatalog::new(dir.path());
    let scenario = catalog.scenario("broken");
    assert!(catalog.list_driver_templates(&scenario).is_ok());

    let err = catalog.list_workloads(&scenario).unwrap_err();
    assert!(err.is_discovery());
    match err {
        BenchError::NotFound { path, .. } => assert!(path.ends_with("broken/workloads")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn select_scenarios_defaults_to_all() {
    let dir = tempdir().unwrap();
    make_scenario(dir.path(), "b", &[], &[]);
    make_scenario(dir.path(), "a", &[], &[]);

    let catalog = ScenarioCatalog::new(dir.path());
    let names: Vec<String> = catalog
        .select_scenarios(&[])
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn select_scenarios_rejects_unknown_names() {
    let dir = tempdir().unwrap();
    make_scenario(dir.path(), "a", &[], &[]);

    let catalog = ScenarioCatalog::new(dir.path());
    let err = catalog.select_scenarios(&["z".to_string()]).unwrap_err();
    assert!(err.to_string().contains("unknown scenario 'z' (available: a)"));
}
