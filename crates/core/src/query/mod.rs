//! In-memory lookups over cached documents.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vaultdex_core::cache::JsonCache;
//! use vaultdex_core::cancel::CancelToken;
//! use vaultdex_core::query::QueryService;
//!
//! let cache = Arc::new(JsonCache::new("/path/to/vault/.vaultdex/cache"));
//! let service = QueryService::load(cache, &CancelToken::new()).unwrap();
//!
//! for doc in service.by_file_class("meeting") {
//!     println!("{}", doc.id);
//! }
//! ```

pub mod index_set;
pub mod service;

pub use index_set::IndexSet;
pub use service::{QueryService, QuerySnapshot};

use thiserror::Error;

use crate::cache::CacheError;
use crate::cancel::Cancelled;

#[derive(Debug, Error)]
pub enum QueryError {
    /// A single-result lookup found nothing. Collection lookups never
    /// return this; they return an empty list.
    #[error("no document with {kind} '{key}'")]
    NotFound { kind: &'static str, key: String },

    #[error("failed to load documents from cache: {0}")]
    Cache(#[from] CacheError),

    #[error("cache refresh stopped: {0}")]
    Cancelled(#[from] Cancelled),
}

impl QueryError {
    pub(crate) fn not_found(kind: &'static str, key: &str) -> Self {
        Self::NotFound { kind, key: key.to_string() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
