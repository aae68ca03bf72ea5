//! Documents (indexed notes) and their attribute values.

pub mod types;
pub mod value;

pub use types::{Document, DocumentId, FILE_CLASS_FIELD, Frontmatter};
pub use value::AttrValue;
