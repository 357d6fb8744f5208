//! Benchmark configuration.

use clap::ValueEnum;
use keyset::{
    AvlTree, Bst, ChainingTable, Engine, FibonacciHasher, IdentityHasher, Key, ProbeMethod,
    ProbingTable,
};

use crate::{BenchError, Result};

/// Engines the harness knows how to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Structure {
    Bst,
    Avl,
    Chaining,
    Linear,
    Quadratic,
    Double,
}

impl Structure {
    pub const ALL: [Structure; 6] = [
        Structure::Bst,
        Structure::Avl,
        Structure::Chaining,
        Structure::Linear,
        Structure::Quadratic,
        Structure::Double,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Structure::Bst => "BST",
            Structure::Avl => "AVL",
            Structure::Chaining => "Hash chaining",
            Structure::Linear => "Hash linear",
            Structure::Quadratic => "Hash quadratic",
            Structure::Double => "Hash double",
        }
    }

    fn probe_method(&self) -> Option<ProbeMethod> {
        match self {
            Structure::Linear => Some(ProbeMethod::Linear),
            Structure::Quadratic => Some(ProbeMethod::Quadratic),
            Structure::Double => Some(ProbeMethod::Double),
            _ => None,
        }
    }

    /// Open-addressing tables hold at most `table_size` keys.
    pub fn is_open_addressing(&self) -> bool {
        self.probe_method().is_some()
    }

    /// Fresh, empty engine. Table-backed engines get `table_size` slots.
    pub fn build(&self, table_size: usize, hasher: HasherKind) -> Result<Box<dyn Engine>> {
        if let Some(method) = self.probe_method() {
            let engine: Box<dyn Engine> = match hasher {
                HasherKind::Identity => {
                    Box::new(ProbingTable::with_hasher(table_size, method, IdentityHasher)?)
                }
                HasherKind::Fibonacci => {
                    Box::new(ProbingTable::with_hasher(table_size, method, FibonacciHasher)?)
                }
            };
            return Ok(engine);
        }
        let engine: Box<dyn Engine> = match (self, hasher) {
            (Structure::Bst, _) => Box::new(Bst::new()),
            (Structure::Avl, _) => Box::new(AvlTree::new()),
            (_, HasherKind::Identity) => {
                Box::new(ChainingTable::with_hasher(table_size, IdentityHasher)?)
            }
            (_, HasherKind::Fibonacci) => {
                Box::new(ChainingTable::with_hasher(table_size, FibonacciHasher)?)
            }
        };
        Ok(engine)
    }
}

/// Key distributions, in the order the harness runs them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    Random,
    Sorted,
    NearlySorted,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Random,
        DatasetKind::Sorted,
        DatasetKind::NearlySorted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Random => "random",
            DatasetKind::Sorted => "sorted",
            DatasetKind::NearlySorted => "nearly-sorted",
        }
    }
}

/// Integer hash used by the table-backed engines for a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum HasherKind {
    #[default]
    Identity,
    Fibonacci,
}

/// Everything a benchmark run needs.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Keys inserted per dataset (N)
    pub keys: usize,
    /// Search operations (M); half hit, half miss
    pub searches: usize,
    /// Delete operations (K), all on present keys
    pub deletes: usize,
    pub seed: u64,
    /// Share of positions shuffled in the nearly-sorted dataset
    pub disorder: f64,
    /// Keys are drawn from `[key_min, key_max)`
    pub key_min: Key,
    pub key_max: Key,
    /// Explicit table size; overrides `target_load`
    pub table_size: Option<usize>,
    /// Load factor the derived table size aims for
    pub target_load: f64,
    pub hasher: HasherKind,
    pub structures: Vec<Structure>,
    pub datasets: Vec<DatasetKind>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let keys = 50_000;
        Self {
            keys,
            searches: keys,
            deletes: keys / 10,
            seed: 42,
            disorder: 0.10,
            key_min: 1,
            key_max: 1_000_000_000,
            table_size: None,
            target_load: 0.5,
            hasher: HasherKind::Identity,
            structures: Structure::ALL.to_vec(),
            datasets: DatasetKind::ALL.to_vec(),
        }
    }
}

impl BenchConfig {
    /// Table size for every table-backed engine: `table_size` if given,
    /// otherwise the smallest prime ≥ `keys / target_load`.
    pub fn resolved_table_size(&self) -> usize {
        if let Some(size) = self.table_size {
            return size;
        }
        let wanted = (self.keys as f64 / self.target_load).ceil() as usize;
        next_prime(wanted.max(2))
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(BenchError::InvalidConfig(msg));

        if self.keys == 0 {
            return invalid("keys must be at least 1".to_string());
        }
        if self.deletes > self.keys {
            return invalid(format!(
                "deletes ({}) cannot exceed keys ({})",
                self.deletes, self.keys
            ));
        }
        if !(0.0..=1.0).contains(&self.disorder) {
            return invalid(format!("disorder {} outside [0, 1]", self.disorder));
        }
        if self.key_min >= self.key_max {
            return invalid(format!(
                "empty key range [{}, {})",
                self.key_min, self.key_max
            ));
        }
        // Strictly more candidates than keys, so absent search keys exist.
        let range = self.key_max.abs_diff(self.key_min);
        if range <= self.keys as u64 {
            return invalid(format!(
                "key range of {range} values too small for {} distinct keys",
                self.keys
            ));
        }
        if self.table_size.is_none() && !(self.target_load > 0.0 && self.target_load <= 1.0) {
            return invalid(format!("target load {} outside (0, 1]", self.target_load));
        }
        let size = self.resolved_table_size();
        if size < 2 {
            return invalid(format!("table size {size} must be greater than 1"));
        }
        if size < self.keys && self.structures.iter().any(Structure::is_open_addressing) {
            return invalid(format!(
                "table size {size} cannot hold {} keys with open addressing",
                self.keys
            ));
        }
        if self.structures.is_empty() {
            return invalid("no structures selected".to_string());
        }
        if self.datasets.is_empty() {
            return invalid("no datasets selected".to_string());
        }
        Ok(())
    }
}

/// Smallest prime `>= n`.
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let c = BenchConfig::default();
        c.validate().unwrap();
        assert_eq!(c.searches, 50_000);
        assert_eq!(c.deletes, 5_000);
        // Smallest prime at or above 100_000.
        assert_eq!(c.resolved_table_size(), 100_003);
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(8), 11);
        assert_eq!(next_prime(13), 13);
        assert_eq!(next_prime(90), 97);
    }

    #[test]
    fn test_explicit_table_size() {
        let c = BenchConfig {
            table_size: Some(64),
            keys: 10,
            searches: 10,
            deletes: 1,
            ..BenchConfig::default()
        };
        assert_eq!(c.resolved_table_size(), 64);
        c.validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_configs() {
        let base = BenchConfig {
            keys: 100,
            searches: 100,
            deletes: 10,
            ..BenchConfig::default()
        };

        let too_many_deletes = BenchConfig {
            deletes: 101,
            ..base.clone()
        };
        assert!(too_many_deletes.validate().is_err());

        let bad_disorder = BenchConfig {
            disorder: 1.5,
            ..base.clone()
        };
        assert!(bad_disorder.validate().is_err());

        let small_table = BenchConfig {
            table_size: Some(50),
            ..base.clone()
        };
        assert!(small_table.validate().is_err());

        // Chaining alone may run over capacity.
        let small_chaining = BenchConfig {
            table_size: Some(50),
            structures: vec![Structure::Chaining, Structure::Avl],
            ..base.clone()
        };
        small_chaining.validate().unwrap();

        let narrow_range = BenchConfig {
            key_min: 0,
            key_max: 100,
            ..base.clone()
        };
        assert!(narrow_range.validate().is_err());

        let zero_load = BenchConfig {
            target_load: 0.0,
            ..base.clone()
        };
        assert!(zero_load.validate().is_err());

        let nothing = BenchConfig {
            structures: vec![],
            ..base
        };
        assert!(matches!(nothing.validate(), Err(BenchError::InvalidConfig(_))));
    }

    #[test]
    fn test_build_every_structure() {
        for s in Structure::ALL {
            for h in [HasherKind::Identity, HasherKind::Fibonacci] {
                let mut e = s.build(11, h).unwrap();
                assert_eq!(e.name(), s.name());
                assert!(e.insert(7).unwrap());
                assert!(e.search(7));
            }
        }
        assert!(Structure::Chaining.build(1, HasherKind::Identity).is_err());
        assert!(Structure::Bst.build(1, HasherKind::Identity).is_ok());
    }

    #[test]
    fn test_build_dispatches_probe_method() {
        for (s, name) in [
            (Structure::Linear, "Hash linear"),
            (Structure::Quadratic, "Hash quadratic"),
            (Structure::Double, "Hash double"),
        ] {
            assert!(s.is_open_addressing());
            for h in [HasherKind::Identity, HasherKind::Fibonacci] {
                let e = s.build(7, h).unwrap();
                assert_eq!(e.name(), name);
                assert_eq!(e.metrics().table_size, Some(7));
            }
            // Undersized tables surface the engine's own error.
            assert!(matches!(
                s.build(1, HasherKind::Identity),
                Err(BenchError::Engine(keyset::Error::InvalidTableSize { size: 1 }))
            ));
        }
        for s in [Structure::Bst, Structure::Avl, Structure::Chaining] {
            assert!(!s.is_open_addressing());
        }
    }
}
