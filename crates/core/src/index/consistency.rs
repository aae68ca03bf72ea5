//! Comparison of live vault documents against cache entries.

use std::collections::BTreeSet;

use crate::document::{Document, DocumentId};

/// Differences between the vault and the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConsistency {
    /// Indexable files found in the vault.
    pub vault_documents: usize,
    pub cache_entries: usize,
    /// Cached ids with no file behind them.
    pub orphaned: Vec<DocumentId>,
    /// Vault files with no cache entry.
    pub missing: Vec<DocumentId>,
}

impl CacheConsistency {
    pub fn compare(live: &BTreeSet<DocumentId>, cached: &[Document]) -> Self {
        let cached_ids: BTreeSet<&DocumentId> = cached.iter().map(|d| &d.id).collect();

        let orphaned = cached_ids
            .iter()
            .filter(|id| !live.contains(**id))
            .map(|id| (*id).clone())
            .collect();
        let missing = live.iter().filter(|id| !cached_ids.contains(id)).cloned().collect();

        Self { vault_documents: live.len(), cache_entries: cached_ids.len(), orphaned, missing }
    }

    pub fn is_consistent(&self) -> bool {
        self.orphaned.is_empty() && self.missing.is_empty()
    }
}
