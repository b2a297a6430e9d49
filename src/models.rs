//! Data models for benchmark results.
//!
//! This module contains the core data structures that flow through the
//! pipeline: raw records, the loaded dataset, per-group averages and the
//! thread-by-method matrix handed to the chart renderer.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of worker threads a benchmark run used.
///
/// The value `0` is a sentinel written by the benchmark producer for the
/// parallel-algorithm mode, where no explicit thread count applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct ThreadCount(pub u32);

impl ThreadCount {
    /// Sentinel for runs in parallel-algorithm mode.
    pub const PARALLEL: ThreadCount = ThreadCount(0);

    /// Returns true if this is the parallel-mode sentinel.
    pub fn is_parallel(&self) -> bool {
        *self == Self::PARALLEL
    }

    /// Human-readable label, marking the parallel sentinel explicitly.
    pub fn label(&self) -> String {
        if self.is_parallel() {
            "0 (parallel)".to_string()
        } else {
            self.0.to_string()
        }
    }
}

impl fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single benchmark observation.
///
/// Only the three columns below are read from the input file; anything
/// else on the row (array size, run index, checksum) is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    /// Summation strategy label (e.g. "locked", "reduce").
    #[serde(rename = "Method")]
    pub method: String,
    /// Thread count for the run.
    #[serde(rename = "Threads")]
    pub threads: ThreadCount,
    /// Wall-clock duration in milliseconds.
    #[serde(rename = "Time_ms")]
    pub time_ms: f64,
}

impl Record {
    /// Create a new record.
    #[allow(dead_code)] // Constructor for building datasets in code
    pub fn new(method: impl Into<String>, threads: u32, time_ms: f64) -> Self {
        Self {
            method: method.into(),
            threads: ThreadCount(threads),
            time_ms,
        }
    }
}

/// Ordered collection of records loaded from a results file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from already-parsed records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Average and sample size of one (method, threads) group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    /// Arithmetic mean of `Time_ms` over the group.
    pub mean_ms: f64,
    /// Number of records in the group.
    pub samples: usize,
}

/// Mean time per (method, threads) pair.
///
/// Every pair present in the source dataset has exactly one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateTable {
    groups: BTreeMap<(String, ThreadCount), GroupStats>,
}

impl AggregateTable {
    pub(crate) fn from_groups(groups: BTreeMap<(String, ThreadCount), GroupStats>) -> Self {
        Self { groups }
    }

    /// Mean time for a pair, if that pair was observed.
    pub fn mean(&self, method: &str, threads: ThreadCount) -> Option<f64> {
        self.stats(method, threads).map(|s| s.mean_ms)
    }

    /// Full statistics for a pair, if that pair was observed.
    pub fn stats(&self, method: &str, threads: ThreadCount) -> Option<GroupStats> {
        self.groups.get(&(method.to_string(), threads)).copied()
    }

    /// Iterate over all groups in (method, threads) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ThreadCount, GroupStats)> + '_ {
        self.groups
            .iter()
            .map(|((method, threads), stats)| (method.as_str(), *threads, *stats))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Thread-by-method matrix of mean times.
///
/// Rows are thread counts in ascending order, columns are methods. A cell
/// is `None` when that combination never occurred in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotMatrix {
    threads: Vec<ThreadCount>,
    methods: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PivotMatrix {
    pub(crate) fn from_parts(
        threads: Vec<ThreadCount>,
        methods: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> Self {
        debug_assert_eq!(cells.len(), threads.len());
        debug_assert!(cells.iter().all(|row| row.len() == methods.len()));
        Self {
            threads,
            methods,
            cells,
        }
    }

    /// Row labels, ascending.
    pub fn threads(&self) -> &[ThreadCount] {
        &self.threads
    }

    /// Column labels.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Look up a single cell by its labels.
    #[allow(dead_code)] // Utility for single-cell queries
    pub fn get(&self, threads: ThreadCount, method: &str) -> Option<f64> {
        let row = self.threads.iter().position(|t| *t == threads)?;
        let col = self.methods.iter().position(|m| m == method)?;
        self.cells[row][col]
    }

    /// Iterate rows as (thread count, cells in column order).
    pub fn rows(&self) -> impl Iterator<Item = (ThreadCount, &[Option<f64>])> + '_ {
        self.threads
            .iter()
            .copied()
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Largest defined cell value, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }

    /// Number of defined cells.
    pub fn defined_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// True when there are no rows and no columns.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty() && self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> PivotMatrix {
        PivotMatrix::from_parts(
            vec![ThreadCount(0), ThreadCount(4)],
            vec!["locked".to_string(), "reduce".to_string()],
            vec![vec![Some(5.0), None], vec![Some(12.5), Some(9.0)]],
        )
    }

    #[test]
    fn test_thread_count_ordering() {
        assert!(ThreadCount::PARALLEL < ThreadCount(1));
        assert!(ThreadCount(2) < ThreadCount(16));
    }

    #[test]
    fn test_thread_count_label() {
        assert_eq!(ThreadCount(0).label(), "0 (parallel)");
        assert_eq!(ThreadCount(8).label(), "8");
        assert_eq!(ThreadCount(0).to_string(), "0");
        assert!(ThreadCount(0).is_parallel());
        assert!(!ThreadCount(1).is_parallel());
    }

    #[test]
    fn test_record_deserializes_from_csv_row() {
        let data = "Method,Threads,Run,Time_ms\nreduce,0,3,4.5\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let records: Vec<Record> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(records, vec![Record::new("reduce", 0, 4.5)]);
        assert!(records[0].threads.is_parallel());
    }

    #[test]
    fn test_dataset_from_iter() {
        let dataset: Dataset = vec![Record::new("locked", 1, 10.0), Record::new("reduce", 2, 4.0)]
            .into_iter()
            .collect();
        assert_eq!(dataset.len(), 2);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.records()[1].threads, ThreadCount(2));
    }

    #[test]
    fn test_matrix_lookup() {
        let matrix = sample_matrix();
        assert_eq!(matrix.get(ThreadCount(0), "locked"), Some(5.0));
        assert_eq!(matrix.get(ThreadCount(0), "reduce"), None);
        assert_eq!(matrix.get(ThreadCount(4), "reduce"), Some(9.0));
        assert_eq!(matrix.get(ThreadCount(8), "locked"), None);
        assert_eq!(matrix.get(ThreadCount(4), "unlocked"), None);
    }

    #[test]
    fn test_matrix_max_and_counts() {
        let matrix = sample_matrix();
        assert_eq!(matrix.max_value(), Some(12.5));
        assert_eq!(matrix.defined_cells(), 3);
        assert!(!matrix.is_empty());

        let empty = PivotMatrix::default();
        assert_eq!(empty.max_value(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_matrix_rows() {
        let matrix = sample_matrix();
        let rows: Vec<_> = matrix.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, ThreadCount(0));
        assert_eq!(rows[1].1, &[Some(12.5), Some(9.0)]);
    }
}
