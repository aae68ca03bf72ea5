//! In-memory collaborators for unit tests.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use crate::cache::{CacheError, CacheReader, CacheWriter};
use crate::document::{Document, DocumentId, Frontmatter};
use crate::frontmatter::{DocumentEnricher, EnrichError};
use crate::vault::{VaultFile, VaultScanner, VaultWalkerError};

pub fn vault_file(relative: &str, content: &str) -> VaultFile {
    VaultFile::new(
        PathBuf::from("/vault").join(relative),
        PathBuf::from(relative),
        SystemTime::now(),
        content.as_bytes().to_vec(),
    )
}

/// Scanner over a fixed list of files. `modified` is what `scan_modified`
/// returns regardless of `since`. `unlisted` files exist but are left out of
/// every scan, as if unreadable.
#[derive(Default)]
pub struct FakeScanner {
    pub files: Mutex<Vec<VaultFile>>,
    pub modified: Mutex<Vec<VaultFile>>,
    pub unlisted: Mutex<BTreeSet<String>>,
    pub fail_scan: bool,
    pub fail_paths: bool,
}

impl FakeScanner {
    pub fn with_files(paths: &[&str]) -> Self {
        let files: Vec<_> = paths.iter().map(|p| vault_file(p, "# note")).collect();
        Self { files: Mutex::new(files), ..Default::default() }
    }

    pub fn set_modified(&self, paths: &[&str]) {
        *self.modified.lock().unwrap() = paths.iter().map(|p| vault_file(p, "# changed")).collect();
    }

    /// Keep `path` on disk but out of the scan results.
    pub fn make_unreadable(&self, path: &str) {
        self.remove(path);
        self.unlisted.lock().unwrap().insert(path.to_string());
    }

    pub fn remove(&self, path: &str) {
        self.files
            .lock()
            .unwrap()
            .retain(|f| f.relative_path.to_string_lossy() != path);
    }
}

fn scan_failure() -> VaultWalkerError {
    VaultWalkerError::MissingRoot("/vault".to_string())
}

impl VaultScanner for FakeScanner {
    fn scan_all(&self) -> Result<Vec<VaultFile>, VaultWalkerError> {
        if self.fail_scan {
            return Err(scan_failure());
        }
        Ok(self.files.lock().unwrap().clone())
    }

    fn scan_modified(&self, _since: DateTime<Utc>) -> Result<Vec<VaultFile>, VaultWalkerError> {
        if self.fail_scan {
            return Err(scan_failure());
        }
        Ok(self.modified.lock().unwrap().clone())
    }

    fn scan_paths(&self) -> Result<Vec<String>, VaultWalkerError> {
        if self.fail_paths {
            return Err(scan_failure());
        }
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.relative_path.to_string_lossy().into_owned())
            .collect())
    }

    fn is_gone(&self, relative_path: &str) -> bool {
        let listed =
            self.files.lock().unwrap().iter().any(|f| f.relative_path == Path::new(relative_path));
        !listed && !self.unlisted.lock().unwrap().contains(relative_path)
    }
}

/// Cache backed by a map, with per-id write/delete failures and a switch
/// that makes `list` fail.
#[derive(Default)]
pub struct MemoryCache {
    pub entries: Mutex<BTreeMap<DocumentId, Document>>,
    pub fail_writes: BTreeSet<String>,
    pub fail_deletes: BTreeSet<String>,
    pub fail_list: bool,
    pub persist_calls: AtomicUsize,
}

impl MemoryCache {
    pub fn failing_writes(ids: &[&str]) -> Self {
        Self { fail_writes: ids.iter().map(|s| s.to_string()).collect(), ..Default::default() }
    }

    pub fn insert(&self, doc: Document) {
        self.entries.lock().unwrap().insert(doc.id.clone(), doc);
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().map(|id| id.to_string()).collect()
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }
}

fn injected(kind: &str) -> io::Error {
    io::Error::other(format!("injected {kind} failure"))
}

impl CacheWriter for MemoryCache {
    fn persist(&self, document: &Document) -> Result<(), CacheError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.contains(document.id.as_str()) {
            return Err(CacheError::Write {
                id: document.id.clone(),
                path: PathBuf::from("/cache"),
                operation: "write",
                source: injected("write"),
            });
        }
        self.insert(document.clone());
        Ok(())
    }

    fn delete(&self, id: &DocumentId) -> Result<(), CacheError> {
        if self.fail_deletes.contains(id.as_str()) {
            return Err(CacheError::Delete {
                id: id.clone(),
                path: PathBuf::from("/cache"),
                source: injected("delete"),
            });
        }
        self.entries.lock().unwrap().remove(id);
        Ok(())
    }
}

impl CacheReader for MemoryCache {
    fn read(&self, id: &DocumentId) -> Result<Document, CacheError> {
        self.entries
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound { id: id.clone() })
    }

    fn list(&self) -> Result<Vec<Document>, CacheError> {
        if self.fail_list {
            return Err(CacheError::List { dir: PathBuf::from("/cache"), source: injected("list") });
        }
        Ok(self.entries.lock().unwrap().values().cloned().collect())
    }
}

/// Enricher that tags every document with a fixed class and rejects the
/// listed paths.
pub struct FakeEnricher {
    pub file_class: String,
    pub reject: BTreeSet<String>,
}

impl FakeEnricher {
    pub fn new(file_class: &str, reject: &[&str]) -> Self {
        Self {
            file_class: file_class.to_string(),
            reject: reject.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DocumentEnricher for FakeEnricher {
    fn enrich(&self, file: &VaultFile) -> Result<Frontmatter, EnrichError> {
        let path = file.relative_path.to_string_lossy().into_owned();
        if self.reject.contains(&path) {
            return Err(EnrichError::Invalid {
                path: file.relative_path.clone(),
                message: "missing required field".to_string(),
            });
        }
        Ok(Frontmatter { file_class: self.file_class.clone(), fields: BTreeMap::new() })
    }
}
