//! Reshaping averages into a thread-by-method matrix.

use crate::models::{AggregateTable, PivotMatrix, ThreadCount};
use std::collections::BTreeSet;
use tracing::debug;

/// Pivot an aggregate table: rows are thread counts, columns are methods.
///
/// Thread counts are sorted numerically, so the parallel sentinel `0`
/// always comes first. Methods are sorted lexicographically. A pair that
/// never occurred stays `None` and is never filled with zero.
pub fn pivot(table: &AggregateTable) -> PivotMatrix {
    let threads: Vec<ThreadCount> = table
        .iter()
        .map(|(_, t, _)| t)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let methods: Vec<String> = table
        .iter()
        .map(|(m, _, _)| m)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();

    let cells = threads
        .iter()
        .map(|&t| methods.iter().map(|m| table.mean(m, t)).collect())
        .collect();

    debug!(
        "Pivoted into {} rows x {} columns",
        threads.len(),
        methods.len()
    );

    PivotMatrix::from_parts(threads, methods, cells)
}
