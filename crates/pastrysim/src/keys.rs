//! Node key generation and trial sampling

use rand::seq::index;
use rand::Rng;
use std::collections::BTreeSet;

/// A (source, destination) pair of indices into the sorted key list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPair {
    pub source: usize,
    pub dest: usize,
}

/// Draw `count` distinct non-negative keys, sorted ascending
pub fn generate_keys<R: Rng>(count: usize, rng: &mut R) -> Vec<u64> {
    let mut keys = BTreeSet::new();
    while keys.len() < count {
        keys.insert(rng.gen_range(0..=i64::MAX as u64));
    }
    keys.into_iter().collect()
}

/// Pick two distinct indices below `n`; the destination is drawn first
pub fn sample_pair<R: Rng>(n: usize, rng: &mut R) -> TrialPair {
    let picks = index::sample(rng, n, 2);
    TrialPair {
        dest: picks.index(0),
        source: picks.index(1),
    }
}
