//! Pastry prefix routing simulation
//!
//! This crate implements the routing core of a Pastry-style overlay:
//! - Fixed-radix identifier encoding (radix `2^b`, digits `0-9A-F`)
//! - A per-node prefix routing table with closest-key placement
//! - A hop-by-hop routing loop over a fixed, sorted node set
//!
//! Everything is deterministic and single-threaded. A routing table is a
//! snapshot: the simulator rebuilds it at every hop from the nodes that are
//! still visible to the current node.

pub mod codec;
pub mod error;
pub mod routing_table;
pub mod simulator;

pub use codec::{IdentifierCodec, ZeroEncoding, MAX_RADIX_EXPONENT};
pub use error::{PastryError, Result};
pub use routing_table::{degree_match, row_count, RoutingTable};
pub use simulator::{RoutingSimulator, SimulationConfig, Terminal, TrialOutcome};

/// Expected hop count `log_{2^b}(N)` for `N` nodes
pub fn expected_hops(total_nodes: usize, radix_exponent: u32) -> f64 {
    (total_nodes as f64).ln() / (f64::from(radix_exponent) * std::f64::consts::LN_2)
}
