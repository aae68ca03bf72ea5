//! Frontmatter extraction and the document enrichment seam.
//!
//! The indexer hands every eligible file to an optional [`DocumentEnricher`]
//! that supplies the document's category and attributes. Schema validation
//! lives behind that trait; [`FrontmatterExtractor`] is the plain
//! YAML-frontmatter implementation.

pub mod parser;

pub use parser::{FrontmatterParseError, ParsedDocument, parse};

use std::path::PathBuf;
use thiserror::Error;

use crate::document::Frontmatter;
use crate::vault::VaultFile;

/// Errors raised while enriching a document.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },

    #[error("failed to parse frontmatter in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: FrontmatterParseError,
    },

    #[error("{path} failed validation: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// Produces the category and attributes for a scanned file.
pub trait DocumentEnricher: Send + Sync {
    fn enrich(&self, file: &VaultFile) -> Result<Frontmatter, EnrichError>;
}

/// Enricher that reads YAML frontmatter without checking it against any schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterExtractor;

impl DocumentEnricher for FrontmatterExtractor {
    fn enrich(&self, file: &VaultFile) -> Result<Frontmatter, EnrichError> {
        let content = std::str::from_utf8(&file.content)
            .map_err(|_| EnrichError::Encoding { path: file.relative_path.clone() })?;
        let parsed = parse(content)
            .map_err(|source| EnrichError::Parse { path: file.relative_path.clone(), source })?;
        Ok(Frontmatter::from_fields(parsed.fields.unwrap_or_default()))
    }
}
