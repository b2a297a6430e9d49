//! Benchmark results loading.
//!
//! Reads a comma-separated results file into a [`Dataset`]. The header row
//! is checked for the required columns before any row is parsed, so a
//! missing column is reported by name instead of as a per-row failure.

use crate::models::{Dataset, Record};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Columns every results file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["Method", "Threads", "Time_ms"];

/// Failure to turn the input file into a dataset.
///
/// This is the one failure the binary handles explicitly: it is reported
/// to the user and the process exits with status 1 without drawing a chart.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File missing or unreadable.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Not parseable as CSV (e.g. ragged rows, invalid UTF-8).
    #[error("{}: malformed CSV: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// Header row lacks one of [`REQUIRED_COLUMNS`].
    #[error("{}: missing required column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A field could not be converted to its typed value.
    #[error("{}: line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// Load a results file.
pub fn load(path: &Path) -> Result<Dataset, DataLoadError> {
    info!("Loading results from: {}", path.display());

    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataLoadError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }
    debug!("Header columns: {:?}", headers);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = row.position().map_or(0, |p| p.line());

        let record: Record = row
            .deserialize(Some(&headers))
            .map_err(|e| DataLoadError::Parse {
                path: path.to_path_buf(),
                line,
                message: e.to_string(),
            })?;

        if !record.time_ms.is_finite() || record.time_ms < 0.0 {
            return Err(DataLoadError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!(
                    "Time_ms must be a non-negative number, got {}",
                    record.time_ms
                ),
            });
        }

        records.push(record);
    }

    info!("Loaded {} records", records.len());
    Ok(Dataset::new(records))
}
