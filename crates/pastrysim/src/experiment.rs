//! Monte Carlo hop-count experiment
//!
//! For every radix exponent `b` and node count `N`, routes
//! `trials * trials` random messages, and compares the mean hop count with
//! `log_{2^b}(N)` through a chi-square statistic.

use crate::config::Config;
use crate::keys::{generate_keys, sample_pair};
use crate::stats::{chi_square_p_value, Series};
use anyhow::Result;
use pastry_routing::{expected_hops, RoutingSimulator, SimulationConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Measurements for one node count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCountResult {
    pub nodes: usize,
    /// Mean hop count of each batch
    pub batch_means: Vec<f64>,
    pub mean: f64,
    pub expected: f64,
    pub stddev: f64,
    /// `(mean - expected) / stddev`, absent when the batches did not vary
    pub chi: Option<f64>,
    pub trials: usize,
    pub stalls: usize,
}

/// Measurements for one radix exponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExponentResult {
    pub radix_exponent: u32,
    pub points: Vec<NodeCountResult>,
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub config: Config,
    pub results: Vec<ExponentResult>,
}

/// Runs the experiment described by a [`Config`]
pub struct Experiment {
    config: Config,
    keys: Vec<u64>,
    rng: StdRng,
}

impl Experiment {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let keys = generate_keys(config.nodes.upper, &mut rng);
        debug!(count = keys.len(), "generated node keys");

        Ok(Self { config, keys, rng })
    }

    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    pub fn run(&mut self) -> Result<ExperimentReport> {
        let exponents = self.config.radix_exponents.clone();
        let mut results = Vec::with_capacity(exponents.len());

        for b in exponents {
            info!(b, "simulating radix 2^{}", b);
            results.push(self.run_exponent(b)?);
        }

        Ok(ExperimentReport {
            config: self.config.clone(),
            results,
        })
    }

    /// Sweep all configured node counts for one radix exponent
    pub fn run_exponent(&mut self, radix_exponent: u32) -> Result<ExponentResult> {
        let nodes = self.config.nodes;
        let mut points = Vec::with_capacity(nodes.len());
        let mut chi_square = 0.0;

        for n in nodes.iter() {
            let point = self.run_node_count(radix_exponent, n)?;

            match point.chi {
                Some(chi) => chi_square += chi * chi,
                None => warn!(
                    b = radix_exponent,
                    n, "batch means did not vary; skipping chi-square term"
                ),
            }

            info!(
                b = radix_exponent,
                n,
                mean = point.mean,
                expected = point.expected,
                stalls = point.stalls,
                "node count done"
            );
            points.push(point);
        }

        let degrees_of_freedom = points.len();
        Ok(ExponentResult {
            radix_exponent,
            p_value: chi_square_p_value(degrees_of_freedom, chi_square),
            points,
            chi_square,
            degrees_of_freedom,
        })
    }

    /// Route `trials` batches of `trials` messages among the first `n` keys
    pub fn run_node_count(&mut self, radix_exponent: u32, n: usize) -> Result<NodeCountResult> {
        let sim_config =
            SimulationConfig::new(radix_exponent).with_zero_encoding(self.config.zero_encoding);
        let sim = RoutingSimulator::new(&self.keys[..n], sim_config)?;

        let trials = self.config.trials;
        let mut batch_means = Series::new();
        let mut stalls = 0;

        for _ in 0..trials {
            let mut hops = Series::new();
            for _ in 0..trials {
                let pair = sample_pair(n, &mut self.rng);
                let outcome = sim.route(pair.source, pair.dest)?;
                if outcome.stalled() {
                    stalls += 1;
                }
                hops.add(f64::from(outcome.hops));
            }
            batch_means.add(hops.mean());
        }

        let stats = batch_means.stats();
        let expected = expected_hops(n, radix_exponent);
        let chi = (stats.stddev > 0.0).then(|| (stats.mean - expected) / stats.stddev);

        Ok(NodeCountResult {
            nodes: n,
            batch_means: batch_means.values().to_vec(),
            mean: stats.mean,
            expected,
            stddev: stats.stddev,
            chi,
            trials: trials * trials,
            stalls,
        })
    }
}
