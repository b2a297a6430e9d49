//! Analysis modules.
//!
//! Grouping, averaging and reshaping of loaded benchmark results.

pub mod aggregator;
pub mod pivot;

pub use aggregator::*;
pub use pivot::pivot;
