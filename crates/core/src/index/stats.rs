//! Counters reported by one indexer run.

use std::time::Duration;

/// Statistics from an indexing operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of files the scanner returned.
    pub scanned_count: usize,
    /// Number of documents written to the cache.
    pub indexed_count: usize,
    /// Cache writes and deletes that failed.
    pub cache_failures: usize,
    pub validation_successes: usize,
    /// Files the enricher rejected; these are not persisted.
    pub validation_failures: usize,
    /// Cache entries deleted because their file is gone.
    pub orphans_removed: usize,
    pub duration: Duration,
}

impl IndexStats {
    /// True when the run finished but some documents were not written or
    /// removed as they should have been.
    pub fn has_warnings(&self) -> bool {
        self.cache_failures > 0 || self.validation_failures > 0
    }
}
