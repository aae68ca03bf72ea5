//! JSON file-per-document cache.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{CacheError, CacheReader, CacheWriter};
use crate::document::{Document, DocumentId};
use crate::identity::{CACHE_FILE_EXT, cache_file_name, document_id_from_cache_file_name};

/// Prefix of in-flight temp files; hidden, so listings skip them.
const TEMP_PREFIX: &str = ".vaultdex-";
const TEMP_SUFFIX: &str = ".partial";

/// Cache stored as one pretty-printed JSON file per document under `root`.
#[derive(Debug, Clone)]
pub struct JsonCache {
    root: PathBuf,
}

impl JsonCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the cache entry for `id`.
    pub fn entry_path(&self, id: &DocumentId) -> PathBuf {
        self.root.join(cache_file_name(id))
    }

    /// Remove every cache entry. Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for path in self.entry_paths()? {
            let id = id_hint(&path);
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(CacheError::Delete { id, path, source }),
            }
        }
        debug!(cache_dir = %self.root.display(), removed, "cache cleared");
        Ok(removed)
    }

    /// Paths of all entry files. A missing root has no entries.
    fn entry_paths(&self) -> Result<Vec<PathBuf>, CacheError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(cache_dir = %self.root.display(), "cache directory missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(CacheError::List { dir: self.root.clone(), source }),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|source| CacheError::List { dir: self.root.clone(), source })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                warn!(path = %entry.path().display(), "skipping cache entry with non-UTF-8 name");
                continue;
            };
            if name.starts_with('.') || !name.ends_with(CACHE_FILE_EXT) {
                continue;
            }
            if entry.file_type().is_ok_and(|t| t.is_file()) {
                paths.push(entry.path());
            }
        }
        Ok(paths)
    }

    fn read_entry(&self, id: DocumentId, path: PathBuf) -> Result<Document, CacheError> {
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(CacheError::NotFound { id }),
            Err(source) => return Err(CacheError::Read { id, path, source }),
        };
        let document: Document = serde_json::from_slice(&data)
            .map_err(|source| CacheError::Parse { id: id.clone(), path: path.clone(), source })?;
        debug!(document_id = %id, path = %path.display(), "cache read");
        Ok(document)
    }
}

/// Best-effort id for diagnostics about a file whose content may be unreadable.
fn id_hint(path: &Path) -> DocumentId {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    document_id_from_cache_file_name(&name).unwrap_or_else(|| DocumentId::new(name.into_owned()))
}

impl CacheWriter for JsonCache {
    fn persist(&self, document: &Document) -> Result<(), CacheError> {
        let id = &document.id;
        let path = self.entry_path(id);
        let write_err = |operation: &'static str| {
            let path = path.clone();
            move |source: std::io::Error| CacheError::Write { id: id.clone(), path, operation, source }
        };

        fs::create_dir_all(&self.root).map_err(write_err("create_cache_dir"))?;

        let data = serde_json::to_vec_pretty(document).map_err(|source| CacheError::Serialize {
            id: id.clone(),
            path: path.clone(),
            source,
        })?;

        // temp file in the same directory so the rename stays on one filesystem
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(write_err("create_temp"))?;
        temp.write_all(&data).map_err(write_err("write_temp"))?;
        temp.as_file().sync_all().map_err(write_err("sync"))?;
        temp.persist(&path).map_err(|e| write_err("rename")(e.error))?;

        debug!(document_id = %id, path = %path.display(), "cache write");
        Ok(())
    }

    fn delete(&self, id: &DocumentId) -> Result<(), CacheError> {
        let path = self.entry_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(document_id = %id, path = %path.display(), "cache delete");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(document_id = %id, path = %path.display(), "cache delete (entry already absent)");
                Ok(())
            }
            Err(source) => Err(CacheError::Delete { id: id.clone(), path, source }),
        }
    }
}

impl CacheReader for JsonCache {
    fn read(&self, id: &DocumentId) -> Result<Document, CacheError> {
        self.read_entry(id.clone(), self.entry_path(id))
    }

    fn list(&self) -> Result<Vec<Document>, CacheError> {
        let mut documents = Vec::new();
        for path in self.entry_paths()? {
            match self.read_entry(id_hint(&path), path.clone()) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable cache entry");
                }
            }
        }
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(cache_dir = %self.root.display(), count = documents.len(), "cache list");
        Ok(documents)
    }
}
