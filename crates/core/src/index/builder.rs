//! Index building orchestration.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::consistency::CacheConsistency;
use super::stats::IndexStats;
use crate::cache::{CacheError, CacheReader, CacheWriter};
use crate::cancel::{CancelToken, Cancelled};
use crate::document::{Document, DocumentId, Frontmatter};
use crate::frontmatter::DocumentEnricher;
use crate::identity::{document_id_from_path, normalize_relative};
use crate::vault::{VaultFile, VaultScanner, VaultWalkerError, extension_matches, path_extension};

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("vault scan failed: {0}")]
    Scan(#[from] VaultWalkerError),

    #[error("indexing stopped: {0}")]
    Cancelled(#[from] Cancelled),

    #[error("cache check failed: {0}")]
    Cache(#[from] CacheError),
}

/// Settings that shape which files become documents.
#[derive(Debug, Clone)]
pub struct IndexerOptions {
    /// Stripped from scanner paths that arrive absolute.
    pub vault_root: PathBuf,
    /// Extensions that are indexed; everything else is skipped.
    pub extensions: Vec<String>,
}

impl IndexerOptions {
    pub fn new(vault_root: impl Into<PathBuf>) -> Self {
        Self { vault_root: vault_root.into(), ..Default::default() }
    }
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self { vault_root: PathBuf::new(), extensions: vec!["md".to_string()] }
    }
}

/// Turns scanned vault files into cache entries.
///
/// Holds no state between runs: every [`build`](Self::build) or
/// [`refresh`](Self::refresh) is a self-contained pass with its own stats.
/// Callers must not run two passes against the same cache at once.
pub struct Indexer<'a> {
    scanner: &'a dyn VaultScanner,
    writer: &'a dyn CacheWriter,
    reader: &'a dyn CacheReader,
    enricher: Option<&'a dyn DocumentEnricher>,
    options: IndexerOptions,
}

impl<'a> Indexer<'a> {
    pub fn new(
        scanner: &'a dyn VaultScanner,
        writer: &'a dyn CacheWriter,
        reader: &'a dyn CacheReader,
        enricher: Option<&'a dyn DocumentEnricher>,
        options: IndexerOptions,
    ) -> Self {
        Self { scanner, writer, reader, enricher, options }
    }

    /// Index every file in the vault.
    ///
    /// A scan failure aborts the run; a failed write is counted and skipped.
    pub fn build(&self, cancel: &CancelToken) -> Result<IndexStats, IndexerError> {
        let start = Instant::now();
        let mut stats = IndexStats::default();

        cancel.check()?;
        let files = self.scanner.scan_all()?;
        stats.scanned_count = files.len();

        self.process_files(&files, &mut stats, cancel)?;
        stats.duration = start.elapsed();

        let live = self.eligible_ids(files.iter().map(|f| f.relative_path.as_path()));
        self.log_consistency(&live);
        log_summary("vault indexing complete", &stats);

        Ok(stats)
    }

    /// Index files modified at or after `since`, then delete cache entries
    /// whose file no longer exists.
    ///
    /// Reconciliation runs even when nothing was modified.
    pub fn refresh(
        &self,
        since: DateTime<Utc>,
        cancel: &CancelToken,
    ) -> Result<IndexStats, IndexerError> {
        let start = Instant::now();
        let mut stats = IndexStats::default();

        cancel.check()?;
        let files = self.scanner.scan_modified(since)?;
        stats.scanned_count = files.len();

        self.process_files(&files, &mut stats, cancel)?;

        cancel.check()?;
        self.reconcile_deletions(&mut stats);
        stats.duration = start.elapsed();

        log_summary("vault refresh complete", &stats);
        Ok(stats)
    }

    /// Compare the live vault against the cache without changing either.
    pub fn verify_cache(&self) -> Result<CacheConsistency, IndexerError> {
        let paths = self.scanner.scan_paths()?;
        let live = self.eligible_ids(paths.iter().map(Path::new));
        let cached = self.reader.list()?;
        Ok(CacheConsistency::compare(&live, &cached))
    }

    fn process_files(
        &self,
        files: &[VaultFile],
        stats: &mut IndexStats,
        cancel: &CancelToken,
    ) -> Result<(), IndexerError> {
        for file in files {
            cancel.check()?;
            if !file.has_extension(&self.options.extensions) {
                continue;
            }
            self.process_file(file, stats);
        }
        Ok(())
    }

    fn process_file(&self, file: &VaultFile, stats: &mut IndexStats) {
        let id = self.document_id(&file.relative_path);

        let frontmatter = match self.enricher {
            Some(enricher) => match enricher.enrich(file) {
                Ok(frontmatter) => {
                    stats.validation_successes += 1;
                    frontmatter
                }
                Err(e) => {
                    stats.validation_failures += 1;
                    warn!(document_id = %id, error = %e, "document failed validation, not cached");
                    return;
                }
            },
            None => Frontmatter::default(),
        };

        let document = Document::new(id, frontmatter);
        match self.writer.persist(&document) {
            Ok(()) => stats.indexed_count += 1,
            Err(e) => {
                stats.cache_failures += 1;
                warn!(document_id = %document.id, error = %e, "failed to cache document");
            }
        }
    }

    /// Delete every cached entry whose id has no live, indexable file.
    ///
    /// An entry missing from the listing is only deleted once the scanner
    /// confirms the file is gone; a file hidden by a read error keeps it.
    fn reconcile_deletions(&self, stats: &mut IndexStats) {
        let paths = match self.scanner.scan_paths() {
            Ok(paths) => paths,
            Err(e) => {
                warn!(error = %e, "skipping deletion reconciliation: vault listing failed");
                return;
            }
        };
        let live = self.eligible_ids(paths.iter().map(Path::new));

        let cached = match self.reader.list() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "skipping deletion reconciliation: cache listing failed");
                return;
            }
        };

        for document in cached.iter().filter(|d| !live.contains(&d.id)) {
            if self.is_eligible(&document.id) && !self.scanner.is_gone(document.id.as_str()) {
                warn!(
                    document_id = %document.id,
                    "cache entry kept: file still present but was not scanned"
                );
                continue;
            }

            match self.writer.delete(&document.id) {
                Ok(()) => {
                    stats.orphans_removed += 1;
                    debug!(document_id = %document.id, "removed orphaned cache entry");
                }
                Err(e) => {
                    stats.cache_failures += 1;
                    warn!(
                        document_id = %document.id,
                        error = %e,
                        "failed to remove orphaned cache entry"
                    );
                }
            }
        }
    }

    /// Scanner paths are vault-relative; only absolute ones lose the root.
    fn document_id(&self, path: &Path) -> DocumentId {
        if path.is_absolute() {
            document_id_from_path(&self.options.vault_root, path)
        } else {
            DocumentId::new(normalize_relative(&path.to_string_lossy()))
        }
    }

    fn is_eligible(&self, id: &DocumentId) -> bool {
        extension_matches(path_extension(id.as_str()), &self.options.extensions)
    }

    fn eligible_ids<'p>(&self, paths: impl Iterator<Item = &'p Path>) -> BTreeSet<DocumentId> {
        paths.map(|p| self.document_id(p)).filter(|id| self.is_eligible(id)).collect()
    }

    fn log_consistency(&self, live: &BTreeSet<DocumentId>) {
        let cached = match self.reader.list() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "could not list cache for consistency check");
                return;
            }
        };

        let report = CacheConsistency::compare(live, &cached);
        if report.is_consistent() {
            debug!(documents = report.cache_entries, "cache consistent with vault");
        } else {
            warn!(
                orphaned = report.orphaned.len(),
                missing = report.missing.len(),
                "cache inconsistent with vault"
            );
        }
    }
}

fn log_summary(message: &str, stats: &IndexStats) {
    info!(
        scanned = stats.scanned_count,
        indexed = stats.indexed_count,
        cache_failures = stats.cache_failures,
        validation_successes = stats.validation_successes,
        validation_failures = stats.validation_failures,
        orphans_removed = stats.orphans_removed,
        duration_ms = stats.duration.as_millis() as u64,
        "{message}"
    );
}
