//! End-to-end tests for the experiment driver

use pastry_routing::{expected_hops, RoutingSimulator, SimulationConfig, ZeroEncoding};
use pastrysim::{report, Config, Experiment};
use std::fs;

#[test]
fn test_default_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("pastrysim.yaml");

    let written = Config::create_default(Some(path.clone())).unwrap();
    let loaded = Config::load(&path).unwrap();

    assert_eq!(written, loaded);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("--init"));
}

#[test]
fn test_malformed_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "nodes: [1, 2\n").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_experiment_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.yaml");
    fs::write(
        &path,
        "nodes:\n  lower: 20\n  upper: 60\n  step: 20\ntrials: 3\nseed: 11\nradix_exponents: [2, 4]\nzero_encoding: digit\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.zero_encoding, ZeroEncoding::Digit);

    let mut experiment = Experiment::new(config).unwrap();
    let report = experiment.run().unwrap();

    let exponents: Vec<u32> = report.results.iter().map(|r| r.radix_exponent).collect();
    assert_eq!(exponents, vec![2, 4]);

    for result in &report.results {
        let counts: Vec<usize> = result.points.iter().map(|p| p.nodes).collect();
        assert_eq!(counts, vec![20, 40, 60]);

        for point in &result.points {
            let expected = expected_hops(point.nodes, result.radix_exponent);
            assert!((point.expected - expected).abs() < 1e-12);
            assert_eq!(point.trials, 9);
        }
    }

    let text = report::render_text(&report);
    assert!(text.contains("For b = 2"));
    assert!(text.contains("For b = 4"));
}

#[test]
fn test_experiment_uses_smallest_keys() {
    let mut config = Config::default();
    config.nodes.lower = 10;
    config.nodes.upper = 30;
    config.nodes.step = 10;
    config.trials = 2;
    config.radix_exponents = vec![1];

    let experiment = Experiment::new(config).unwrap();
    let keys = experiment.keys();
    assert_eq!(keys.len(), 30);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));

    // Each node count routes over a prefix of one sorted population
    for n in [10, 20, 30] {
        let sim = RoutingSimulator::new(&keys[..n], SimulationConfig::new(1)).unwrap();
        assert_eq!(sim.node_count(), n);
    }
}
