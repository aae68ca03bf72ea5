pub mod doctor;
pub mod index;
pub mod output;
pub mod query;
pub mod refresh;
pub mod verify;

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use vaultdex_core::config::ResolvedConfig;
use vaultdex_core::index::IndexerOptions;
use vaultdex_core::vault::{VaultWalker, VaultWalkerError};

/// Stamp in the cache directory holding the start time of the last
/// successful index or refresh.
pub const LAST_RUN_FILE: &str = ".last-run";

/// Walker over the configured vault. A cache directory inside the vault is
/// always excluded, even when it is not hidden.
pub fn open_walker(rc: &ResolvedConfig) -> Result<VaultWalker, VaultWalkerError> {
    let mut excluded = rc.excluded_folders.clone();
    if let Ok(relative) = rc.cache_dir.strip_prefix(&rc.vault_root)
        && !relative.as_os_str().is_empty()
    {
        excluded.push(relative.to_path_buf());
    }
    VaultWalker::with_exclusions(&rc.vault_root, excluded)
}

pub fn indexer_options(rc: &ResolvedConfig, walker: &VaultWalker) -> IndexerOptions {
    IndexerOptions { vault_root: walker.root().to_path_buf(), extensions: rc.extensions.clone() }
}

pub fn read_last_run(cache_dir: &Path) -> Option<DateTime<Utc>> {
    let raw = fs::read_to_string(cache_dir.join(LAST_RUN_FILE)).ok()?;
    DateTime::parse_from_rfc3339(raw.trim()).ok().map(|t| t.with_timezone(&Utc))
}

pub fn write_last_run(cache_dir: &Path, at: DateTime<Utc>) -> io::Result<()> {
    fs::create_dir_all(cache_dir)?;
    fs::write(cache_dir.join(LAST_RUN_FILE), at.to_rfc3339())
}

/// Record a finished run; failure only costs a wider next refresh.
pub fn record_run(cache_dir: &Path, started: DateTime<Utc>) {
    if let Err(e) = write_last_run(cache_dir, started) {
        tracing::warn!(error = %e, "failed to record last run time");
    }
}
