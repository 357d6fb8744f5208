//! # keyset
//!
//! Integer key containers with one shared operational surface, built to be
//! benchmarked against each other:
//!
//! - [`Bst`]: unbalanced binary search tree (baseline)
//! - [`AvlTree`]: height-balanced BST with a per-tree rotation counter
//! - [`ChainingTable`]: fixed bucket array, one chain per bucket
//! - [`ProbingTable`]: open addressing with linear, quadratic or double-hash
//!   probing and tombstone deletion
//!
//! Every engine implements [`Engine`], so a harness can drive them through the
//! same insert/search/delete workload and read back [`Metrics`].
//!
//! ## Example
//!
//! ```rust
//! use keyset::{AvlTree, Engine, ProbeMethod, ProbingTable};
//!
//! let mut engines: Vec<Box<dyn Engine>> = vec![
//!     Box::new(AvlTree::new()),
//!     Box::new(ProbingTable::new(11, ProbeMethod::Double).unwrap()),
//! ];
//! for e in engines.iter_mut() {
//!     assert_eq!(e.insert(42), Ok(true));
//!     assert!(e.search(42));
//!     assert!(e.delete(42));
//!     assert!(!e.search(42));
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

mod tracing_helpers;

pub mod avl;
pub mod bst;
pub mod chaining;
pub mod error;
pub mod hash;
pub mod metrics;
pub mod pool;
pub mod probing;

pub use avl::AvlTree;
pub use bst::Bst;
pub use chaining::ChainingTable;
pub use error::{Error, Result};
pub use hash::{FibonacciHasher, IdentityHasher, KeyHasher};
pub use metrics::Metrics;
pub use probing::{ProbeMethod, ProbingTable, Slot};

/// Key type stored by every engine.
pub type Key = i64;

/// Uniform surface shared by all engines.
///
/// Duplicate inserts and misses are ordinary `false` results. Only the
/// open-addressing table can fail an insert, with [`Error::TableFull`].
pub trait Engine {
    /// Display name used in reports.
    fn name(&self) -> &'static str;

    /// `Ok(true)` if `key` was added, `Ok(false)` if it was already present
    /// (or, for open addressing, its probe sequence had no free slot).
    fn insert(&mut self, key: Key) -> Result<bool>;

    fn search(&self, key: Key) -> bool;

    /// `true` if `key` was present and is now gone.
    fn delete(&mut self, key: Key) -> bool;

    /// Number of live keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn metrics(&self) -> Metrics;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn insert(&mut self, key: Key) -> Result<bool> {
        (**self).insert(key)
    }

    fn search(&self, key: Key) -> bool {
        (**self).search(key)
    }

    fn delete(&mut self, key: Key) -> bool {
        (**self).delete(key)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn metrics(&self) -> Metrics {
        (**self).metrics()
    }
}

#[cfg(test)]
mod proptests;
