//! Document, identity and frontmatter types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::value::AttrValue;

/// Frontmatter field that carries the document's category.
pub const FILE_CLASS_FIELD: &str = "fileClass";

/// Identity of a cached document: its normalized vault-relative path.
///
/// Built by [`crate::identity::document_id_from_path`]; never from a
/// basename alone, so `projects/meeting.md` and `ideas/meeting.md` stay
/// distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an already-normalized vault-relative path.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Category plus open-ended attributes of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Category label; empty when the note declares none.
    #[serde(rename = "fileClass", default)]
    pub file_class: String,
    /// All attributes, including `fileClass` itself when present.
    #[serde(default)]
    pub fields: BTreeMap<String, AttrValue>,
}

impl Frontmatter {
    /// Build frontmatter from parsed fields, deriving the category from the
    /// string field `fileClass`.
    pub fn from_fields(fields: BTreeMap<String, AttrValue>) -> Self {
        let file_class = fields
            .get(FILE_CLASS_FIELD)
            .and_then(AttrValue::as_str)
            .unwrap_or_default()
            .to_string();
        Self { file_class, fields }
    }

    pub fn is_empty(&self) -> bool {
        self.file_class.is_empty() && self.fields.is_empty()
    }
}

/// One indexed note as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Vault-relative path with `/` separators.
    pub path: String,
    #[serde(default)]
    pub frontmatter: Frontmatter,
    /// Top-level fields written by other tools; carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Document {
    pub fn new(id: DocumentId, frontmatter: Frontmatter) -> Self {
        let path = id.as_str().to_string();
        Self { id, path, frontmatter, extra: BTreeMap::new() }
    }

    pub fn file_class(&self) -> &str {
        &self.frontmatter.file_class
    }

    /// File name without directory or extension (`ideas/meeting.md` -> `meeting`).
    pub fn basename(&self) -> &str {
        basename_of(&self.path)
    }
}

pub(crate) fn basename_of(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    }
}
