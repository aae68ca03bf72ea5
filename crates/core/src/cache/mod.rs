//! File-backed document cache.
//!
//! One JSON file per document, named by [`crate::identity::cache_file_name`].
//! The write side ([`CacheWriter`]) is used by the indexer; the read side
//! ([`CacheReader`]) by the query service.
//!
//! # Example
//!
//! ```no_run
//! use vaultdex_core::cache::{CacheReader, CacheWriter, JsonCache};
//! use vaultdex_core::document::{Document, DocumentId, Frontmatter};
//!
//! let cache = JsonCache::new(".vaultdex/cache");
//! let doc = Document::new(DocumentId::from("ideas/meeting.md"), Frontmatter::default());
//! cache.persist(&doc).unwrap();
//! let back = cache.read(&doc.id).unwrap();
//! assert_eq!(back, doc);
//! ```

pub mod error;
pub mod json;

pub use error::CacheError;
pub use json::JsonCache;

use crate::document::{Document, DocumentId};

/// Write side of the cache.
pub trait CacheWriter: Send + Sync {
    /// Atomically write `document` to its cache entry, replacing any
    /// previous entry. Readers never observe a partial write.
    fn persist(&self, document: &Document) -> Result<(), CacheError>;

    /// Remove the cache entry for `id`. Removing a missing entry succeeds.
    fn delete(&self, id: &DocumentId) -> Result<(), CacheError>;
}

/// Read side of the cache.
pub trait CacheReader: Send + Sync {
    /// Read one entry. A missing entry is [`CacheError::NotFound`].
    fn read(&self, id: &DocumentId) -> Result<Document, CacheError>;

    /// Read every entry. Malformed entries are skipped; only a failure to
    /// enumerate the cache directory is an error.
    fn list(&self) -> Result<Vec<Document>, CacheError>;
}
