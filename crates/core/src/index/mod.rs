//! Vault indexing into the document cache.
//!
//! [`Indexer`] walks the vault through a [`VaultScanner`](crate::vault::VaultScanner),
//! optionally enriches each file, and persists one cache entry per document.
//!
//! # Example
//!
//! ```no_run
//! use vaultdex_core::cache::JsonCache;
//! use vaultdex_core::cancel::CancelToken;
//! use vaultdex_core::frontmatter::FrontmatterExtractor;
//! use vaultdex_core::index::{Indexer, IndexerOptions};
//! use vaultdex_core::vault::VaultWalker;
//! use std::path::Path;
//!
//! let walker = VaultWalker::new(Path::new("/path/to/vault")).unwrap();
//! let cache = JsonCache::new("/path/to/vault/.vaultdex/cache");
//! let indexer = Indexer::new(
//!     &walker,
//!     &cache,
//!     &cache,
//!     Some(&FrontmatterExtractor),
//!     IndexerOptions::new(walker.root()),
//! );
//! let stats = indexer.build(&CancelToken::new()).unwrap();
//! println!("indexed {} of {}", stats.indexed_count, stats.scanned_count);
//! ```

pub mod builder;
pub mod consistency;
pub mod stats;

pub use builder::{Indexer, IndexerError, IndexerOptions};
pub use consistency::CacheConsistency;
pub use stats::IndexStats;
