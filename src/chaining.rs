//! Separate-chaining hash table with a fixed number of buckets.

use std::fmt;

use smallvec::SmallVec;

use crate::hash::{IdentityHasher, KeyHasher};
use crate::tracing_helpers::trace_log;
use crate::{Engine, Error, Key, Metrics, Result};

/// Keys that share a bucket, in insertion order. Short chains stay inline.
pub type Bucket = SmallVec<[Key; 4]>;

/// Fixed-size table of independent buckets.
///
/// The table never grows; the load factor can exceed 1 and chains simply get
/// longer. A collision is counted whenever an insert appends to a bucket that
/// already held at least one key.
#[derive(Debug, Clone)]
pub struct ChainingTable<H = IdentityHasher> {
    buckets: Vec<Bucket>,
    len: usize,
    collisions: u64,
    hasher: H,
}

impl ChainingTable<IdentityHasher> {
    /// Table of `size` buckets using the identity hash. `size` must be > 1.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_hasher(size, IdentityHasher)
    }
}

impl<H: KeyHasher> ChainingTable<H> {
    pub fn with_hasher(size: usize, hasher: H) -> Result<Self> {
        if size < 2 {
            return Err(Error::InvalidTableSize { size });
        }
        Ok(Self {
            buckets: vec![Bucket::new(); size],
            len: 0,
            collisions: 0,
            hasher,
        })
    }

    #[inline]
    fn index(&self, key: Key) -> usize {
        (self.hasher.hash(key) % self.buckets.len() as u64) as usize
    }

    /// Append `key` to its bucket. Returns `false` if it is already present.
    pub fn insert(&mut self, key: Key) -> bool {
        let idx = self.index(key);
        let bucket = &mut self.buckets[idx];
        if bucket.contains(&key) {
            trace_log!(key, bucket = idx, "chaining insert: already present");
            return false;
        }
        if !bucket.is_empty() {
            self.collisions += 1;
            trace_log!(key, bucket = idx, chain = bucket.len(), "chaining insert: collision");
        }
        bucket.push(key);
        self.len += 1;
        true
    }

    pub fn search(&self, key: Key) -> bool {
        self.buckets[self.index(key)].contains(&key)
    }

    /// Splice `key` out of its bucket, keeping the other keys in order.
    pub fn remove(&mut self, key: Key) -> bool {
        let idx = self.index(key);
        let bucket = &mut self.buckets[idx];
        match bucket.iter().position(|&k| k == key) {
            Some(pos) => {
                bucket.remove(pos);
                self.len -= 1;
                trace_log!(key, bucket = idx, "chaining remove");
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

    /// Number of buckets.
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// `len / size`. May exceed 1.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Longest chain in the table.
    pub fn max_chain(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).max().unwrap_or(0)
    }
}

impl<H> fmt::Display for ChainingTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                writeln!(f, "{i}: empty")?;
            } else {
                writeln!(f, "{i}: {:?}", bucket.as_slice())?;
            }
        }
        Ok(())
    }
}

impl<H: KeyHasher> Engine for ChainingTable<H> {
    fn name(&self) -> &'static str {
        "Hash chaining"
    }

    fn insert(&mut self, key: Key) -> Result<bool> {
        Ok(ChainingTable::insert(self, key))
    }

    fn search(&self, key: Key) -> bool {
        ChainingTable::search(self, key)
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
