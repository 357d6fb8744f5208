//! Timed insert/search/delete runs over every (dataset, structure) pair.

use std::hint::black_box;
use std::time::{Duration, Instant};

use keyset::{Engine, Key, Metrics};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{BenchConfig, DatasetKind, Structure};
use crate::datasets;
use crate::Result;

/// Key sequences for one dataset, shared by every structure.
#[derive(Debug, Clone)]
pub struct Workload {
    pub inserts: Vec<Key>,
    pub searches: Vec<Key>,
    pub deletes: Vec<Key>,
}

impl Workload {
    /// Base keys for `kind`, then search and delete keys drawn from them.
    pub fn generate(kind: DatasetKind, config: &BenchConfig, rng: &mut StdRng) -> Self {
        let inserts = kind.generate(rng, config);
        let searches =
            datasets::search_keys(rng, &inserts, config.searches, config.key_min, config.key_max);
        let deletes = datasets::delete_keys(rng, &inserts, config.deletes);
        Self {
            inserts,
            searches,
            deletes,
        }
    }
}

/// One benchmark result row.
///
/// Averages are seconds per operation. Structural metrics are read after the
/// delete phase; the ones an engine doesn't have are `None` and are left out
/// of serialized records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchRecord {
    pub dataset: &'static str,
    pub structure: &'static str,
    pub keys: usize,
    pub avg_insert_s: f64,
    pub avg_search_s: f64,
    pub avg_delete_s: f64,
    #[serde(flatten)]
    pub metrics: Metrics,
    /// Inserts that returned `Ok(false)` for a key not yet stored
    pub failed_inserts: usize,
}

fn per_op(elapsed: Duration, ops: usize) -> f64 {
    if ops == 0 {
        0.0
    } else {
        elapsed.as_secs_f64() / ops as f64
    }
}

/// Drives `engine` through the workload's three phases.
///
/// The workload's base keys are distinct, so every `Ok(false)` during the
/// insert phase is a failed insert (probe exhaustion).
pub fn run_engine<E: Engine + ?Sized>(
    engine: &mut E,
    dataset: &'static str,
    workload: &Workload,
) -> Result<BenchRecord> {
    let mut failed = 0usize;
    let start = Instant::now();
    for &key in &workload.inserts {
        if !engine.insert(key)? {
            failed += 1;
        }
    }
    let insert_time = start.elapsed();

    let start = Instant::now();
    for &key in &workload.searches {
        black_box(engine.search(black_box(key)));
    }
    let search_time = start.elapsed();

    let start = Instant::now();
    for &key in &workload.deletes {
        black_box(engine.delete(black_box(key)));
    }
    let delete_time = start.elapsed();

    Ok(BenchRecord {
        dataset,
        structure: engine.name(),
        keys: workload.inserts.len(),
        avg_insert_s: per_op(insert_time, workload.inserts.len()),
        avg_search_s: per_op(search_time, workload.searches.len()),
        avg_delete_s: per_op(delete_time, workload.deletes.len()),
        metrics: engine.metrics(),
        failed_inserts: failed,
    })
}

/// Runs every configured dataset against every configured structure.
///
/// Datasets come from one RNG seeded with `config.seed`, so a seed fixes every
/// key sequence of the run.
pub fn run(config: &BenchConfig) -> Result<Vec<BenchRecord>> {
    config.validate()?;
    let table_size = config.resolved_table_size();
    info!(
        keys = config.keys,
        searches = config.searches,
        deletes = config.deletes,
        table_size,
        seed = config.seed,
        "starting benchmark"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.datasets.len() * config.structures.len());

    for &kind in &config.datasets {
        let workload = Workload::generate(kind, config, &mut rng);
        info!(dataset = kind.name(), "generated dataset");

        for &structure in &config.structures {
            let record = run_structure(structure, kind, table_size, config, &workload)?;
            records.push(record);
        }
    }
    Ok(records)
}

fn run_structure(
    structure: Structure,
    kind: DatasetKind,
    table_size: usize,
    config: &BenchConfig,
    workload: &Workload,
) -> Result<BenchRecord> {
    let mut engine = structure.build(table_size, config.hasher)?;
    let record = run_engine(&mut engine, kind.name(), workload)?;

    if record.failed_inserts > 0 {
        warn!(
            dataset = kind.name(),
            structure = structure.name(),
            failed = record.failed_inserts,
            "inserts found no free slot"
        );
    }
    debug!(?record, "record");
    info!(
        dataset = kind.name(),
        structure = structure.name(),
        avg_insert_s = record.avg_insert_s,
        avg_search_s = record.avg_search_s,
        avg_delete_s = record.avg_delete_s,
        "finished"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HasherKind;
    use crate::BenchError;
    use keyset::{AvlTree, ProbeMethod, ProbingTable};

    fn small_config() -> BenchConfig {
        BenchConfig {
            keys: 500,
            searches: 200,
            deletes: 50,
            key_max: 100_000,
            ..BenchConfig::default()
        }
    }

    #[test]
    fn test_workload_shape() {
        let config = small_config();
        let mut rng = StdRng::seed_from_u64(1);
        let w = Workload::generate(DatasetKind::NearlySorted, &config, &mut rng);
        assert_eq!(w.inserts.len(), 500);
        assert_eq!(w.searches.len(), 200);
        assert_eq!(w.deletes.len(), 50);
        assert!(w.deletes.iter().all(|k| w.inserts.contains(k)));
    }

    #[test]
    fn test_run_engine_counts() {
        let workload = Workload {
            inserts: (1..=100).collect(),
            searches: vec![1, 2, 500],
            deletes: (1..=10).collect(),
        };
        let mut tree = AvlTree::new();
        let r = run_engine(&mut tree, "sorted", &workload).unwrap();
        assert_eq!(r.structure, "AVL");
        assert_eq!(r.keys, 100);
        assert_eq!(r.failed_inserts, 0);
        assert_eq!(tree.len(), 90);
        assert!(r.metrics.rotations.unwrap() > 0);
        assert!(r.metrics.table_size.is_none());
        assert!(r.avg_insert_s >= 0.0);
    }

    #[test]
    fn test_run_engine_failed_inserts() {
        // Quadratic probing on 7 slots: keys 3, 10, 17, 24 share home 3 and
        // the probe sequence only reaches slots 3, 4, 5, 0.
        let workload = Workload {
            inserts: vec![3, 10, 17, 24, 31],
            searches: vec![],
            deletes: vec![],
        };
        let mut table = ProbingTable::new(7, ProbeMethod::Quadratic).unwrap();
        let r = run_engine(&mut table, "random", &workload).unwrap();
        assert_eq!(r.failed_inserts, 1);
        assert_eq!(r.metrics.table_size, Some(7));
        assert_eq!(r.avg_search_s, 0.0);
    }

    #[test]
    fn test_run_all_pairs() {
        let config = small_config();
        let records = run(&config).unwrap();
        assert_eq!(records.len(), 3 * 6);
        for r in &records {
            assert_eq!(r.keys, 500);
            assert_eq!(r.failed_inserts, 0, "{} on {}", r.structure, r.dataset);
        }
        let sorted_bst = records
            .iter()
            .find(|r| r.dataset == "sorted" && r.structure == "BST")
            .unwrap();
        // Ascending input degenerates into a chain; deletes only shorten it.
        assert!(sorted_bst.metrics.height.unwrap() >= 450);
        let sorted_avl = records
            .iter()
            .find(|r| r.dataset == "sorted" && r.structure == "AVL")
            .unwrap();
        assert!(sorted_avl.metrics.height.unwrap() <= 13);
    }

    #[test]
    fn test_run_is_reproducible_for_structure() {
        let config = BenchConfig {
            structures: vec![Structure::Chaining, Structure::Double],
            hasher: HasherKind::Fibonacci,
            ..small_config()
        };
        let a = run(&config).unwrap();
        let b = run(&config).unwrap();
        let counters = |rs: &[BenchRecord]| -> Vec<_> {
            rs.iter().map(|r| (r.metrics.collisions, r.metrics.load_factor)).collect()
        };
        assert_eq!(counters(&a), counters(&b));
    }

    #[test]
    fn test_record_json_skips_absent_metrics() {
        let workload = Workload {
            inserts: vec![1, 2, 3],
            searches: vec![2],
            deletes: vec![3],
        };
        let mut tree = AvlTree::new();
        let avl = run_engine(&mut tree, "random", &workload).unwrap();
        let mut table = ProbingTable::new(7, ProbeMethod::Linear).unwrap();
        let linear = run_engine(&mut table, "random", &workload).unwrap();

        let avl = serde_json::to_value(&avl).unwrap();
        let fields = avl.as_object().unwrap();
        assert_eq!(avl["structure"], "AVL");
        assert_eq!(avl["len"], 2);
        assert_eq!(avl["height"], 2);
        assert_eq!(avl["rotations"], 1);
        for absent in ["table_size", "load_factor", "collisions", "metrics"] {
            assert!(!fields.contains_key(absent), "{absent}");
        }

        let linear = serde_json::to_value(&linear).unwrap();
        let fields = linear.as_object().unwrap();
        assert_eq!(linear["table_size"], 7);
        assert_eq!(linear["collisions"], 0);
        assert!(!fields.contains_key("height"));
        assert!(!fields.contains_key("rotations"));
        assert_eq!(linear["failed_inserts"], 0);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = BenchConfig {
            deletes: 1_000,
            ..small_config()
        };
        assert!(matches!(run(&config), Err(BenchError::InvalidConfig(_))));
    }
}
