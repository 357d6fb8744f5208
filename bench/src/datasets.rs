//! Key set generators.
//!
//! All generators draw distinct keys from a half-open range `[min, max)` and
//! take the RNG from the caller, so one seed reproduces a whole run.

use std::collections::HashSet;

use keyset::Key;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::config::{BenchConfig, DatasetKind};

/// `n` distinct keys sampled uniformly from `[min, max)`, in sample order.
///
/// Panics if the range holds fewer than `n` values.
pub fn random_keys<R: Rng + ?Sized>(rng: &mut R, n: usize, min: Key, max: Key) -> Vec<Key> {
    let span = max.abs_diff(min) as usize;
    index::sample(rng, span, n)
        .into_iter()
        .map(|i| min + i as Key)
        .collect()
}

/// [`random_keys`], sorted ascending. The worst case for the plain BST.
pub fn sorted_keys<R: Rng + ?Sized>(rng: &mut R, n: usize, min: Key, max: Key) -> Vec<Key> {
    let mut keys = random_keys(rng, n, min, max);
    keys.sort_unstable();
    keys
}

/// Sorted keys with `floor(n * disorder)` positions picked at random and their
/// values shuffled among those positions.
pub fn nearly_sorted_keys<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    disorder: f64,
    min: Key,
    max: Key,
) -> Vec<Key> {
    let mut keys = sorted_keys(rng, n, min, max);
    let count = ((n as f64 * disorder) as usize).min(n);
    let positions = index::sample(rng, n, count).into_vec();
    let mut values: Vec<Key> = positions.iter().map(|&i| keys[i]).collect();
    values.shuffle(rng);
    for (&pos, value) in positions.iter().zip(values) {
        keys[pos] = value;
    }
    keys
}

/// `m` search keys: up to `m / 2` sampled from `inserted`, the rest drawn from
/// `[min, max)` and guaranteed absent from it.
///
/// The two halves are concatenated, hits first.
pub fn search_keys<R: Rng + ?Sized>(
    rng: &mut R,
    inserted: &[Key],
    m: usize,
    min: Key,
    max: Key,
) -> Vec<Key> {
    let present = (m / 2).min(inserted.len());
    let mut keys: Vec<Key> = index::sample(rng, inserted.len(), present)
        .into_iter()
        .map(|i| inserted[i])
        .collect();

    let set: HashSet<Key> = inserted.iter().copied().collect();
    while keys.len() < m {
        let candidate = rng.gen_range(min..max);
        if !set.contains(&candidate) {
            keys.push(candidate);
        }
    }
    keys
}

/// `k` distinct keys sampled from `inserted`.
pub fn delete_keys<R: Rng + ?Sized>(rng: &mut R, inserted: &[Key], k: usize) -> Vec<Key> {
    index::sample(rng, inserted.len(), k.min(inserted.len()))
        .into_iter()
        .map(|i| inserted[i])
        .collect()
}

impl DatasetKind {
    /// Base key set for this distribution under `config`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, config: &BenchConfig) -> Vec<Key> {
        let (n, min, max) = (config.keys, config.key_min, config.key_max);
        match self {
            DatasetKind::Random => random_keys(rng, n, min, max),
            DatasetKind::Sorted => sorted_keys(rng, n, min, max),
            DatasetKind::NearlySorted => nearly_sorted_keys(rng, n, config.disorder, min, max),
        }
    }
}
