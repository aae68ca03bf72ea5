//! Cache error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::document::DocumentId;

/// Errors from cache persistence. Every variant names the operation, the
/// document and the file it touched.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache write failed for {id} at {path} during {operation}: {source}")]
    Write {
        id: DocumentId,
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("cache write failed for {id} at {path} during serialize: {source}")]
    Serialize {
        id: DocumentId,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache delete failed for {id} at {path}: {source}")]
    Delete {
        id: DocumentId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache read failed for {id} at {path}: {source}")]
    Read {
        id: DocumentId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache entry for {id} at {path} is malformed: {source}")]
    Parse {
        id: DocumentId,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no cache entry for {id}")]
    NotFound { id: DocumentId },

    #[error("failed to list cache directory {dir}: {source}")]
    List {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
