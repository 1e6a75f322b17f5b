//! pastrysim - Monte Carlo driver for the Pastry routing simulation
//!
//! Generates a seeded node population, routes random messages through
//! [`pastry_routing::RoutingSimulator`] for a range of node counts and radix
//! exponents, and tests the mean hop count against `log_{2^b}(N)`.

pub mod config;
pub mod experiment;
pub mod keys;
pub mod report;
pub mod stats;

pub use config::{Config, LoggingConfig, NodeRange};
pub use experiment::{Experiment, ExperimentReport, ExponentResult, NodeCountResult};
pub use keys::{generate_keys, sample_pair, TrialPair};
pub use stats::{chi_square_p_value, Series, Stats};
