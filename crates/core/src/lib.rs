#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation
)]

//! Vault indexing and query engine.
//!
//! The write path scans a vault, derives a collision-free identity for each
//! document and persists one JSON cache entry per document
//! ([`index::Indexer`], [`cache::JsonCache`]). The read path loads the cache
//! into in-memory indices and answers lookups from many threads at once
//! ([`query::QueryService`]).

pub mod cache;
pub mod cancel;
pub mod config;
pub mod document;
pub mod frontmatter;
pub mod identity;
pub mod index;
pub mod query;
pub mod vault;

#[cfg(test)]
pub(crate) mod testing;
