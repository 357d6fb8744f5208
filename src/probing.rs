//! Open-addressing hash table with linear, quadratic or double-hash probing.
//!
//! Slots are one of three states. Removal leaves a [`Slot::Tombstone`] rather
//! than [`Slot::Empty`]: a later key may have probed past the removed one when
//! it was inserted, and an `Empty` in its path would end its search early.
//!
//! ```text
//! probe(key, i), i in 0..size:
//!   linear     (h1 + i)      mod size
//!   quadratic  (h1 + i*i)    mod size
//!   double     (h1 + i*h2)   mod size
//!
//! h1 = hash mod size
//! h2 = 1 + hash mod (size - 1)    never 0
//! ```
//!
//! Quadratic probing visits at most about half the slots of a prime-sized
//! table, so an insert there can exhaust its sequence while free slots remain.

use std::fmt;
use std::str::FromStr;

use crate::hash::{IdentityHasher, KeyHasher};
use crate::tracing_helpers::{debug_log, trace_log, warn_log};
use crate::{Engine, Error, Key, Metrics, Result};

// =============================================================================
// Probe methods
// =============================================================================

/// Probe-sequence discipline, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    Linear,
    Quadratic,
    Double,
}

impl ProbeMethod {
    pub const ALL: [ProbeMethod; 3] = [Self::Linear, Self::Quadratic, Self::Double];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Double => "double",
        }
    }

    fn probe_fn(self) -> ProbeFn {
        match self {
            Self::Linear => probe_linear,
            Self::Quadratic => probe_quadratic,
            Self::Double => probe_double,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "quadratic" => Ok(Self::Quadratic),
            "double" => Ok(Self::Double),
            other => Err(Error::UnknownProbeMethod(other.to_string())),
        }
    }
}

/// Per-key probe inputs, computed once per operation.
#[derive(Clone, Copy, Debug)]
struct ProbeStart {
    /// `h1`, the home slot.
    home: u64,
    /// `h2`; only read by double hashing.
    step: u64,
}

/// `(start, attempt, size) -> slot index`
type ProbeFn = fn(ProbeStart, u64, u64) -> usize;

fn probe_linear(p: ProbeStart, i: u64, size: u64) -> usize {
    ((p.home + i) % size) as usize
}

fn probe_quadratic(p: ProbeStart, i: u64, size: u64) -> usize {
    let offset = (i as u128 * i as u128 % size as u128) as u64;
    ((p.home + offset) % size) as usize
}

fn probe_double(p: ProbeStart, i: u64, size: u64) -> usize {
    let offset = (i as u128 * p.step as u128 % size as u128) as u64;
    ((p.home + offset) % size) as usize
}

// =============================================================================
// Slots
// =============================================================================

/// State of one table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Never held a key. Ends a search.
    #[default]
    Empty,
    /// Held a key that was removed. Searches continue past it; inserts may
    /// reuse it.
    Tombstone,
    Occupied(Key),
}

// =============================================================================
// Table
// =============================================================================

/// Fixed-size open-addressing table.
#[derive(Debug, Clone)]
pub struct ProbingTable<H = IdentityHasher> {
    slots: Vec<Slot>,
    len: usize,
    collisions: u64,
    exhausted: u64,
    method: ProbeMethod,
    probe: ProbeFn,
    hasher: H,
}

impl ProbingTable<IdentityHasher> {
    /// Table of `size` slots using the identity hash. `size` must be > 1.
    pub fn new(size: usize, method: ProbeMethod) -> Result<Self> {
        Self::with_hasher(size, method, IdentityHasher)
    }
}

impl<H: KeyHasher> ProbingTable<H> {
    pub fn with_hasher(size: usize, method: ProbeMethod, hasher: H) -> Result<Self> {
        if size < 2 {
            return Err(Error::InvalidTableSize { size });
        }
        debug_log!(size, %method, "probing table created");
        Ok(Self {
            slots: vec![Slot::Empty; size],
            len: 0,
            collisions: 0,
            exhausted: 0,
            method,
            probe: method.probe_fn(),
            hasher,
        })
    }

    #[inline]
    fn start(&self, key: Key) -> ProbeStart {
        let size = self.slots.len() as u64;
        let hash = self.hasher.hash(key);
        ProbeStart {
            home: hash % size,
            step: 1 + hash % (size - 1),
        }
    }

    /// Slot index visited on attempt `i` for `key`.
    pub fn probe_index(&self, key: Key, i: usize) -> usize {
        (self.probe)(self.start(key), i as u64, self.slots.len() as u64)
    }

    /// Index of the slot holding `key`, walking the probe sequence until a
    /// match, an `Empty` slot, or `size` attempts.
    fn find(&self, key: Key) -> Option<usize> {
        let start = self.start(key);
        let size = self.slots.len() as u64;
        for i in 0..size {
            let idx = (self.probe)(start, i, size);
            match self.slots[idx] {
                Slot::Empty => {
                    trace_log!(key, attempt = i, slot = idx, "probe: empty, key absent");
                    return None;
                }
                Slot::Occupied(k) if k == key => {
                    trace_log!(key, attempt = i, slot = idx, "probe: found");
                    return Some(idx);
                }
                _ => {}
            }
        }
        None
    }

    /// Insert `key`.
    ///
    /// - `Err(TableFull)` if every slot already holds a live key.
    /// - `Ok(false)` if `key` is present, or if its probe sequence ran out
    ///   without meeting an `Empty` or `Tombstone` slot (counted in
    ///   [`exhausted_inserts`](Self::exhausted_inserts)).
    /// - `Ok(true)` once written into the first free slot of its sequence.
    ///
    /// Every occupied slot passed before that free slot counts as a
    /// collision. The walk goes on past a reusable tombstone until it meets
    /// `Empty`, so a live copy of `key` further along is still detected.
    pub fn insert(&mut self, key: Key) -> Result<bool> {
        let size = self.slots.len();
        if self.len == size {
            warn_log!(key, size, "probing insert: table full");
            return Err(Error::TableFull { size });
        }

        let start = self.start(key);
        let mut target: Option<usize> = None;
        let mut collisions = 0u64;
        for i in 0..size as u64 {
            let idx = (self.probe)(start, i, size as u64);
            match self.slots[idx] {
                Slot::Empty => {
                    target.get_or_insert(idx);
                    break;
                }
                Slot::Tombstone => {
                    target.get_or_insert(idx);
                }
                Slot::Occupied(k) if k == key => {
                    trace_log!(key, slot = idx, "probing insert: already present");
                    return Ok(false);
                }
                Slot::Occupied(_) => {
                    if target.is_none() {
                        collisions += 1;
                        trace_log!(key, attempt = i, slot = idx, "probing insert: collision");
                    }
                }
            }
        }

        let Some(idx) = target else {
            self.exhausted += 1;
            self.collisions += collisions;
            debug_log!(key, attempts = size, method = %self.method, "probing insert: sequence exhausted");
            return Ok(false);
        };
        self.slots[idx] = Slot::Occupied(key);
        self.len += 1;
        self.collisions += collisions;
        trace_log!(key, slot = idx, collisions, "probing insert");
        Ok(true)
    }

    pub fn search(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Replace `key`'s slot with a tombstone.
    pub fn remove(&mut self, key: Key) -> bool {
        match self.find(key) {
            Some(idx) => {
                self.slots[idx] = Slot::Tombstone;
                self.len -= 1;
                trace_log!(key, slot = idx, "probing remove: tombstoned");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// `len / size`, never above 1.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Inserts that returned `Ok(false)` because the probe sequence ran out.
    pub fn exhausted_inserts(&self) -> u64 {
        self.exhausted
    }

    pub fn method(&self) -> ProbeMethod {
        self.method
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|s| **s == Slot::Tombstone).count()
    }
}

impl<H> fmt::Display for ProbingTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{i}: empty")?,
                Slot::Tombstone => writeln!(f, "{i}: <removed>")?,
                Slot::Occupied(k) => writeln!(f, "{i}: {k}")?,
            }
        }
        Ok(())
    }
}

impl<H: KeyHasher> Engine for ProbingTable<H> {
    fn name(&self) -> &'static str {
        match self.method {
            ProbeMethod::Linear => "Hash linear",
            ProbeMethod::Quadratic => "Hash quadratic",
            ProbeMethod::Double => "Hash double",
        }
    }

    fn insert(&mut self, key: Key) -> Result<bool> {
        ProbingTable::insert(self, key)
    }

    fn search(&self, key: Key) -> bool {
        ProbingTable::search(self, key)
    }

    fn delete(&mut self, key: Key) -> bool {
        self.remove(key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            table_size: Some(self.size()),
            load_factor: Some(self.load_factor()),
            collisions: Some(self.collisions),
            ..Metrics::with_len(self.len)
        }
    }
}
