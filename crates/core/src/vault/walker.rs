//! Recursive vault directory walker.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{VaultFile, VaultScanner};
use crate::identity::normalize_relative;

/// Directory names that never hold notes.
const SKIPPED_DIRS: [&str; 4] = ["node_modules", "target", "__pycache__", "venv"];

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),
}

/// Walker for discovering files in a vault.
///
/// Hidden entries (which include the `.vaultdex` cache tree), common build
/// directories and configured exclusions are never visited.
#[derive(Debug)]
pub struct VaultWalker {
    root: PathBuf,
    /// Folders to exclude from walking (relative paths from vault root).
    excluded_folders: Vec<PathBuf>,
}

impl VaultWalker {
    /// Create a new walker for the given vault root.
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Create a new walker with folder exclusions.
    ///
    /// Excluded folders can be specified as:
    /// - Relative paths from vault root (e.g., "automations/templates")
    /// - Absolute paths (will be converted to relative)
    pub fn with_exclusions(
        root: &Path,
        excluded_folders: Vec<PathBuf>,
    ) -> Result<Self, VaultWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultWalkerError::MissingRoot(root.display().to_string()))?;

        let excluded_folders = excluded_folders
            .into_iter()
            .map(|p| {
                if p.is_absolute() {
                    let canonical = p.canonicalize().unwrap_or(p);
                    canonical.strip_prefix(&root).map(Path::to_path_buf).unwrap_or(canonical)
                } else {
                    p
                }
            })
            .collect();

        Ok(Self { root, excluded_folders })
    }

    /// Get the vault root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Visit every regular file, or symlink to one, that survives the
    /// exclusion rules, sorted by relative path. Unreadable entries below the
    /// root are logged and skipped; failing to read the root itself is an
    /// error.
    fn walk<F>(&self, mut visit: F) -> Result<(), VaultWalkerError>
    where
        F: FnMut(&DirEntry, PathBuf),
    {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(VaultWalkerError::WalkError(self.root.display().to_string(), e));
                }
                Err(e) => {
                    warn!(error = %e, "skipping unreadable vault entry");
                    continue;
                }
            };

            // Symlinked files are followed; symlinked directories are not
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let relative_path =
                entry.path().strip_prefix(&self.root).unwrap_or(entry.path()).to_path_buf();
            visit(&entry, relative_path);
        }

        Ok(())
    }

    fn collect_files(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<VaultFile>, VaultWalkerError> {
        let mut files = Vec::new();

        self.walk(|entry, relative_path| {
            let modified = match fs::metadata(entry.path()).map(|m| m.modified()) {
                Ok(Ok(modified)) => modified,
                _ => SystemTime::UNIX_EPOCH,
            };
            if let Some(since) = since
                && DateTime::<Utc>::from(modified) < since
            {
                return;
            }

            match fs::read(entry.path()) {
                Ok(content) => files.push(VaultFile::new(
                    entry.path().to_path_buf(),
                    relative_path,
                    modified,
                    content,
                )),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "failed to read vault file");
                }
            }
        })?;

        Ok(files)
    }

    /// Check if an entry should be excluded from walking.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        // Never filter the root directory (depth 0)
        if entry.depth() == 0 {
            return false;
        }
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        self.excludes(relative, entry.file_type().is_dir())
    }

    /// Exclusion rules for a vault-relative path. `is_dir` tells whether the
    /// last component is a directory; every earlier one is.
    fn excludes(&self, relative: &Path, is_dir: bool) -> bool {
        let count = relative.components().count();
        for (i, component) in relative.components().enumerate() {
            let name = component.as_os_str().to_string_lossy();

            // Skip hidden files and directories
            if name.starts_with('.') {
                return true;
            }

            // Skip common non-vault directories
            if (is_dir || i + 1 < count) && SKIPPED_DIRS.contains(&name.as_ref()) {
                return true;
            }
        }

        self.excluded_folders.iter().any(|excluded| relative.starts_with(excluded))
    }
}

impl VaultScanner for VaultWalker {
    fn scan_all(&self) -> Result<Vec<VaultFile>, VaultWalkerError> {
        let start = Instant::now();
        let files = self.collect_files(None)?;
        debug!(files_scanned = files.len(), duration_ms = start.elapsed().as_millis() as u64, "vault scan completed");
        Ok(files)
    }

    fn scan_modified(&self, since: DateTime<Utc>) -> Result<Vec<VaultFile>, VaultWalkerError> {
        let start = Instant::now();
        let files = self.collect_files(Some(since))?;
        debug!(
            files_scanned = files.len(),
            since = %since,
            duration_ms = start.elapsed().as_millis() as u64,
            "incremental vault scan completed"
        );
        Ok(files)
    }

    fn scan_paths(&self) -> Result<Vec<String>, VaultWalkerError> {
        let mut paths = Vec::new();
        self.walk(|_, relative_path| {
            paths.push(normalize_relative(&relative_path.to_string_lossy()));
        })?;
        Ok(paths)
    }

    fn is_gone(&self, relative_path: &str) -> bool {
        let relative = Path::new(relative_path);
        match fs::symlink_metadata(self.root.join(relative)) {
            Ok(meta) => self.excludes(relative, meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                debug!(path = relative_path, error = %e, "cannot confirm file removal");
                false
            }
        }
    }
}
