//! Vault file discovery.
//!
//! The indexer consumes files through the [`VaultScanner`] trait;
//! [`VaultWalker`] is the filesystem implementation.

pub mod file;
pub mod walker;

pub use file::{VaultFile, extension_matches, path_extension};
pub use walker::{VaultWalker, VaultWalkerError};

use chrono::{DateTime, Utc};

/// Source of vault files for indexing.
///
/// Implementations must leave cache-internal directories out of every result.
pub trait VaultScanner: Send + Sync {
    /// Every file in the vault, with content.
    fn scan_all(&self) -> Result<Vec<VaultFile>, VaultWalkerError>;

    /// Files modified at or after `since`, with content.
    fn scan_modified(&self, since: DateTime<Utc>) -> Result<Vec<VaultFile>, VaultWalkerError>;

    /// Vault-relative paths of every live file, without reading content.
    fn scan_paths(&self) -> Result<Vec<String>, VaultWalkerError>;

    /// Whether `relative_path` is confirmed gone from the vault, or still
    /// present but excluded from scanning. A file that cannot be checked is
    /// not gone.
    fn is_gone(&self, relative_path: &str) -> bool;
}
