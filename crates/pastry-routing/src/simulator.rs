//! Hop-by-hop routing over a fixed node set
//!
//! Every hop builds a fresh [`RoutingTable`] for the current node from the
//! keys between it and the destination that have not been visited yet, asks
//! it for the next hop and moves there. A trial ends when the destination is
//! reached or when the chosen hop was already visited (a stall).

use crate::codec::{IdentifierCodec, ZeroEncoding};
use crate::error::{PastryError, Result};
use crate::routing_table::RoutingTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// How a trial ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    Reached,
    Stalled,
}

/// Result of routing one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Number of table lookups, including a final non-productive one
    pub hops: u32,
    pub terminal: Terminal,
    /// Keys visited in order, starting at the source
    pub route: Vec<u64>,
}

impl TrialOutcome {
    pub fn reached(&self) -> bool {
        self.terminal == Terminal::Reached
    }

    pub fn stalled(&self) -> bool {
        self.terminal == Terminal::Stalled
    }
}

/// Parameters shared by every trial of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// `b`, the radix is `2^b`
    pub radix_exponent: u32,
    /// How key 0 is written when node keys are encoded
    #[serde(default)]
    pub zero_encoding: ZeroEncoding,
}

impl SimulationConfig {
    pub fn new(radix_exponent: u32) -> Self {
        SimulationConfig {
            radix_exponent,
            zero_encoding: ZeroEncoding::default(),
        }
    }

    pub fn with_zero_encoding(mut self, zero_encoding: ZeroEncoding) -> Self {
        self.zero_encoding = zero_encoding;
        self
    }
}

/// Routes messages between members of a sorted key list
#[derive(Debug, Clone)]
pub struct RoutingSimulator<'a> {
    sorted_keys: &'a [u64],
    codec: IdentifierCodec,
}

impl<'a> RoutingSimulator<'a> {
    /// Create a simulator over `sorted_keys`
    ///
    /// The keys must be strictly ascending. Their count is the `N` used to
    /// size every routing table.
    pub fn new(sorted_keys: &'a [u64], config: SimulationConfig) -> Result<Self> {
        if sorted_keys.is_empty() {
            return Err(PastryError::Configuration(
                "node set must not be empty".to_string(),
            ));
        }
        if !sorted_keys.windows(2).all(|w| w[0] < w[1]) {
            return Err(PastryError::Configuration(
                "node keys must be sorted ascending and distinct".to_string(),
            ));
        }

        let codec =
            IdentifierCodec::with_zero_encoding(config.radix_exponent, config.zero_encoding)?;

        Ok(RoutingSimulator { sorted_keys, codec })
    }

    pub fn node_count(&self) -> usize {
        self.sorted_keys.len()
    }

    pub fn codec(&self) -> &IdentifierCodec {
        &self.codec
    }

    /// Route one message from `source_index` to `dest_index`
    pub fn route(&self, source_index: usize, dest_index: usize) -> Result<TrialOutcome> {
        let n = self.sorted_keys.len();
        if source_index >= n || dest_index >= n {
            return Err(PastryError::InvalidTrial(format!(
                "indices ({}, {}) out of range for {} nodes",
                source_index, dest_index, n
            )));
        }
        if source_index == dest_index {
            return Err(PastryError::InvalidTrial(
                "source and destination must differ".to_string(),
            ));
        }

        let dest_key = self.sorted_keys[dest_index];
        let target_id = self.codec.encode(dest_key);

        let mut current = source_index;
        let mut visited = HashSet::from([self.sorted_keys[source_index]]);
        let mut route = vec![self.sorted_keys[source_index]];
        let mut hops = 0u32;

        let terminal = loop {
            let (min_bound, max_bound) = if dest_index < current {
                (dest_index, current)
            } else {
                (current + 1, n)
            };

            let owner_id = self.codec.encode(self.sorted_keys[current]);
            let mut table = RoutingTable::new(n, &owner_id, self.codec.radix_exponent())?;

            for (i, key) in self.window(min_bound, max_bound) {
                if i == current || visited.contains(&key) {
                    continue;
                }
                table.add_node(&self.codec.encode(key))?;
            }

            let next = self.codec.decode(table.get_next_node(&target_id))?;
            hops += 1;

            trace!(
                owner = %owner_id,
                window = ?(min_bound..max_bound),
                entries = table.len(),
                next,
                "hop"
            );

            if next == dest_key {
                route.push(next);
                break Terminal::Reached;
            }
            if visited.contains(&next) {
                break Terminal::Stalled;
            }

            current = self
                .sorted_keys
                .binary_search(&next)
                .map_err(|_| PastryError::UnknownKey(next))?;
            visited.insert(next);
            route.push(next);
        };

        debug!(source_index, dest_index, hops, ?terminal, "trial finished");

        Ok(TrialOutcome {
            hops,
            terminal,
            route,
        })
    }

    /// Keys with list index in `[min_bound, max_bound)`
    fn window(
        &self,
        min_bound: usize,
        max_bound: usize,
    ) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.sorted_keys[min_bound..max_bound]
            .iter()
            .enumerate()
            .map(move |(offset, &key)| (min_bound + offset, key))
    }
}
