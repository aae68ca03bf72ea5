//! Identity derivation for cached documents.
//!
//! Two pure, total functions:
//! - vault-relative path -> [`DocumentId`]
//! - [`DocumentId`] -> cache entry file name
//!
//! Separators in the id become `-` in the file name. Every `-` and `%` that
//! is already part of the path is percent-encoded first, so the mapping stays
//! injective: `a-b/c.md` and `a/b-c.md` can never share a cache file.
//! Non-ASCII text is kept as is. Names that would still exceed
//! [`MAX_FILE_NAME_LEN`] bytes are cut down to a prefix plus a SHA-256 of the
//! full id, joined by `~`, which never appears unescaped otherwise.
//!
//! # Examples
//! ```
//! use vaultdex_core::identity::{cache_file_name, document_id_from_path};
//! use std::path::Path;
//!
//! let id = document_id_from_path(Path::new("/vault"), Path::new("/vault/projects/meeting.md"));
//! assert_eq!(id.as_str(), "projects/meeting.md");
//! assert_eq!(cache_file_name(&id), "projects-meeting.md.json");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::document::DocumentId;

/// Extension of every cache entry file.
pub const CACHE_FILE_EXT: &str = ".json";

/// Longest file name, in bytes, accepted by common filesystems.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Marks a hashed cache file name.
const HASH_MARKER: char = '~';

/// Characters escaped before separators are substituted.
const CACHE_NAME_ESCAPES: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b'-')
    .add(b':')
    .add(b'*')
    .add(b'?')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'|')
    .add(b'~')
    .add(b'\\');

/// Derive the document id for `path`.
///
/// `path` may be absolute (under `vault_root`) or already vault-relative.
/// Backslashes are treated as separators, `.` segments and empty segments
/// are dropped.
pub fn document_id_from_path(vault_root: &Path, path: &Path) -> DocumentId {
    if let Ok(relative) = path.strip_prefix(vault_root) {
        return DocumentId::new(normalize_relative(&relative.to_string_lossy()));
    }

    // strip_prefix is component-wise; roots written with `\` separators only
    // match after both sides are normalized
    let raw = path.to_string_lossy().replace('\\', "/");
    let root = vault_root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');
    let relative = match raw.strip_prefix(root) {
        Some(rest) if !root.is_empty() && rest.starts_with('/') => rest,
        _ => raw.as_str(),
    };

    DocumentId::new(normalize_relative(relative))
}

/// Normalize a relative path string: `\` -> `/`, no empty or `.` segments.
pub fn normalize_relative(raw: &str) -> String {
    raw.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Cache entry file name for `id` (`projects/meeting.md` -> `projects-meeting.md.json`).
pub fn cache_file_name(id: &DocumentId) -> String {
    let normalized = normalize_relative(id.as_str());
    let stem = escape(&normalized).replace('/', "-");

    if stem.len() + CACHE_FILE_EXT.len() <= MAX_FILE_NAME_LEN {
        return format!("{stem}{CACHE_FILE_EXT}");
    }

    let digest = format!("{:x}", Sha256::digest(normalized.as_bytes()));
    let budget =
        MAX_FILE_NAME_LEN - CACHE_FILE_EXT.len() - digest.len() - HASH_MARKER.len_utf8();
    let mut cut = budget;
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{HASH_MARKER}{digest}{CACHE_FILE_EXT}", &stem[..cut])
}

/// Percent-encode the ASCII escape set; other characters pass through.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut buf = [0u8; 4];
    for c in raw.chars() {
        if c.is_ascii() {
            out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), CACHE_NAME_ESCAPES));
        } else {
            out.push(c);
        }
    }
    out
}

/// Recover the document id from a cache entry file name.
///
/// Returns `None` for names that were not produced by [`cache_file_name`]
/// and for hashed names, whose id only lives inside the entry.
pub fn document_id_from_cache_file_name(file_name: &str) -> Option<DocumentId> {
    let stem = file_name.strip_suffix(CACHE_FILE_EXT)?;
    if stem.is_empty() || stem.contains(HASH_MARKER) {
        return None;
    }
    let with_separators = stem.replace('-', "/");
    let decoded = percent_decode_str(&with_separators).decode_utf8().ok()?;
    Some(DocumentId::new(decoded.into_owned()))
}
