//! Result aggregation and statistics.
//!
//! This module groups benchmark records by (method, thread count), averages
//! them, and derives the summary statistics printed after a run.

use crate::models::{AggregateTable, Dataset, GroupStats, PivotMatrix, ThreadCount};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Average `Time_ms` per (method, threads) group.
///
/// Uses a running mean, so finite inputs always give a finite average even
/// when their sum would overflow.
pub fn aggregate(dataset: &Dataset) -> AggregateTable {
    let mut running: HashMap<(String, ThreadCount), GroupStats> = HashMap::new();

    for record in dataset.records() {
        let stats = running
            .entry((record.method.clone(), record.threads))
            .or_insert(GroupStats {
                mean_ms: 0.0,
                samples: 0,
            });
        stats.samples += 1;
        stats.mean_ms += (record.time_ms - stats.mean_ms) / stats.samples as f64;
    }

    let groups: BTreeMap<_, _> = running.into_iter().collect();

    debug!(
        "Aggregated {} records into {} groups",
        dataset.len(),
        groups.len()
    );

    AggregateTable::from_groups(groups)
}

/// Fastest method within one thread-count row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowWinner {
    pub threads: ThreadCount,
    pub method: String,
    pub mean_ms: f64,
    /// Number of runs behind `mean_ms`.
    pub samples: usize,
}

/// Pick the method with the lowest mean for every row of the matrix.
///
/// Rows with no defined cells are skipped. Ties go to the first method in
/// column order.
pub fn fastest_per_row(table: &AggregateTable, matrix: &PivotMatrix) -> Vec<RowWinner> {
    matrix
        .rows()
        .filter_map(|(threads, cells)| {
            cells
                .iter()
                .zip(matrix.methods())
                .filter_map(|(cell, method)| cell.map(|v| (method, v)))
                .fold(None, |best: Option<(&String, f64)>, (method, v)| match best {
                    Some((_, b)) if b <= v => best,
                    _ => Some((method, v)),
                })
                .map(|(method, mean_ms)| RowWinner {
                    threads,
                    method: method.clone(),
                    mean_ms,
                    samples: table.stats(method, threads).map_or(0, |s| s.samples),
                })
        })
        .collect()
}

/// Sample count of every observed (threads, method) group, by row.
pub fn samples_per_group(table: &AggregateTable) -> BTreeMap<ThreadCount, Vec<(String, usize)>> {
    let mut rows: BTreeMap<ThreadCount, Vec<(String, usize)>> = BTreeMap::new();

    for (method, threads, stats) in table.iter() {
        rows.entry(threads)
            .or_default()
            .push((method.to_string(), stats.samples));
    }

    rows
}

/// Generate a text summary of the aggregated results.
pub fn generate_summary_text(table: &AggregateTable, matrix: &PivotMatrix) -> String {
    if table.is_empty() {
        return "No benchmark records to summarize.".to_string();
    }

    let mut lines = Vec::new();

    lines.push(format!(
        "Groups: {} ({} methods x {} thread counts)",
        table.len(),
        matrix.methods().len(),
        matrix.threads().len()
    ));

    let winners = fastest_per_row(table, matrix);
    if !winners.is_empty() {
        lines.push(String::new());
        lines.push("Fastest method per thread count:".to_string());
        for winner in winners {
            lines.push(format!(
                "- {}: {} ({:.2} ms, n={})",
                winner.threads.label(),
                winner.method,
                winner.mean_ms,
                winner.samples
            ));
        }
    }

    lines.push(String::new());
    lines.push("Samples per group:".to_string());
    for (threads, groups) in samples_per_group(table) {
        let counts: Vec<String> = groups
            .iter()
            .map(|(method, n)| format!("{} n={}", method, n))
            .collect();
        lines.push(format!("- {}: {}", threads.label(), counts.join(", ")));
    }

    lines.join("\n")
}
