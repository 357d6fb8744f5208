//! Writing benchmark records: CSV, JSON and a console table.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::harness::BenchRecord;
use crate::Result;

pub const CSV_HEADER: &str = "dataset,structure,keys,avg_insert_s,avg_search_s,avg_delete_s,\
height,rotations,table_size,load_factor,collisions,failed_inserts";

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Quotes a CSV field if it contains a separator, quote or newline.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes a header line plus one line per record. Metrics that don't apply to
/// a structure become empty cells.
pub fn write_csv<W: Write>(out: &mut W, records: &[BenchRecord]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{:e},{:e},{:e},{},{},{},{},{},{}",
            quote(r.dataset),
            quote(r.structure),
            r.keys,
            r.avg_insert_s,
            r.avg_search_s,
            r.avg_delete_s,
            opt(r.metrics.height),
            opt(r.metrics.rotations),
            opt(r.metrics.table_size),
            opt(r.metrics.load_factor),
            opt(r.metrics.collisions),
            r.failed_inserts,
        )?;
    }
    Ok(())
}

pub fn save_csv(path: &Path, records: &[BenchRecord]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_csv(&mut out, records)?;
    out.flush()?;
    Ok(())
}

/// Pretty-printed JSON array of records.
pub fn save_json(path: &Path, records: &[BenchRecord]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, records)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Console summary, one block per dataset.
pub fn print_summary<W: Write>(out: &mut W, records: &[BenchRecord]) -> Result<()> {
    let mut current: Option<&str> = None;
    for r in records {
        if current != Some(r.dataset) {
            current = Some(r.dataset);
            writeln!(out)?;
            writeln!(out, "Dataset: {} (N={})", r.dataset, r.keys)?;
            writeln!(
                out,
                "{:<16} {:>12} {:>12} {:>12} {:>7} {:>9} {:>6} {:>10} {:>7}",
                "Structure",
                "Insert s/op",
                "Search s/op",
                "Delete s/op",
                "Height",
                "Rotations",
                "Load",
                "Collisions",
                "Failed"
            )?;
            writeln!(out, "{}", "─".repeat(99))?;
        }
        writeln!(
            out,
            "{:<16} {:>12.3e} {:>12.3e} {:>12.3e} {:>7} {:>9} {:>6} {:>10} {:>7}",
            r.structure,
            r.avg_insert_s,
            r.avg_search_s,
            r.avg_delete_s,
            cell(r.metrics.height),
            cell(r.metrics.rotations),
            cell(r.metrics.load_factor.map(|lf| format!("{lf:.3}"))),
            cell(r.metrics.collisions),
            r.failed_inserts,
        )?;
    }
    Ok(())
}
