//! # keyset-bench
//!
//! Benchmark harness for the `keyset` engines: seeded dataset generation,
//! timed insert/search/delete runs, CSV/JSON/console reports and the
//! walkthrough demo behind the `keyset-bench` binary.

pub mod config;
pub mod datasets;
pub mod demo;
pub mod error;
pub mod harness;
pub mod report;

pub use config::{BenchConfig, DatasetKind, HasherKind, Structure};
pub use error::{BenchError, Result};
pub use harness::{run, BenchRecord, Workload};
