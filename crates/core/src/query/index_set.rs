//! The five in-memory indices over cached documents.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::warn;

use super::QueryError;
use crate::document::{AttrValue, Document, DocumentId};
use crate::identity::normalize_relative;

type Bucket = Vec<Arc<Document>>;

/// Immutable set of indices built from one cache listing.
///
/// Built whole and never mutated afterwards; the query service swaps one
/// set for another.
#[derive(Debug, Default)]
pub struct IndexSet {
    generation: u64,
    by_id: HashMap<DocumentId, Arc<Document>>,
    by_path: HashMap<String, Arc<Document>>,
    by_basename: HashMap<String, Bucket>,
    by_file_class: HashMap<String, Bucket>,
    by_field: HashMap<String, HashMap<AttrValue, Bucket>>,
}

impl IndexSet {
    /// Index `documents`. When two entries claim the same id the first is
    /// kept and the rest are logged and ignored.
    pub fn build(documents: Vec<Document>, generation: u64) -> Self {
        let mut set = Self { generation, ..Default::default() };

        for document in documents {
            if set.by_id.contains_key(&document.id) {
                warn!(document_id = %document.id, "duplicate cache entry ignored");
                continue;
            }
            let document = Arc::new(document);

            set.by_id.insert(document.id.clone(), Arc::clone(&document));
            set.by_path.insert(normalize_relative(&document.path), Arc::clone(&document));
            set.by_basename
                .entry(document.basename().to_string())
                .or_default()
                .push(Arc::clone(&document));

            if !document.file_class().is_empty() {
                set.by_file_class
                    .entry(document.file_class().to_string())
                    .or_default()
                    .push(Arc::clone(&document));
            }

            for (field, value) in &document.frontmatter.fields {
                set.by_field
                    .entry(field.clone())
                    .or_default()
                    .entry(value.clone())
                    .or_default()
                    .push(Arc::clone(&document));
            }
        }

        set
    }

    pub(super) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Counter bumped by every successful refresh; 0 before the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Result<Arc<Document>, QueryError> {
        self.by_id
            .get(&DocumentId::from(id))
            .cloned()
            .ok_or_else(|| QueryError::not_found("id", id))
    }

    /// Lookup by vault-relative path; `\` separators and a leading `./`
    /// are accepted.
    pub fn by_path(&self, path: &str) -> Result<Arc<Document>, QueryError> {
        self.by_path
            .get(&normalize_relative(path))
            .cloned()
            .ok_or_else(|| QueryError::not_found("path", path))
    }

    /// Documents whose file name without extension is `basename`.
    pub fn by_basename(&self, basename: &str) -> Vec<Arc<Document>> {
        self.by_basename.get(basename).cloned().unwrap_or_default()
    }

    pub fn by_file_class(&self, file_class: &str) -> Vec<Arc<Document>> {
        self.by_file_class.get(file_class).cloned().unwrap_or_default()
    }

    /// Documents whose frontmatter maps `field` to a value equal to `value`.
    pub fn by_frontmatter(&self, field: &str, value: &AttrValue) -> Vec<Arc<Document>> {
        self.by_field
            .get(field)
            .and_then(|values| values.get(value))
            .cloned()
            .unwrap_or_default()
    }

    /// Every non-empty file class, sorted.
    pub fn file_classes(&self) -> Vec<String> {
        let classes: BTreeSet<&String> = self.by_file_class.keys().collect();
        classes.into_iter().cloned().collect()
    }

    /// All documents, sorted by id.
    pub fn documents(&self) -> Vec<Arc<Document>> {
        let mut documents: Vec<_> = self.by_id.values().cloned().collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        documents
    }
}
