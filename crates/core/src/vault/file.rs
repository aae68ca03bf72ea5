//! Scanned vault files.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file produced by a scan, with its metadata and raw content.
///
/// Consumed once per index pass and then dropped.
#[derive(Debug, Clone)]
pub struct VaultFile {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Path relative to vault root.
    pub relative_path: PathBuf,
    /// File name without extension.
    pub basename: String,
    /// Parent folder, relative to vault root (empty at the root).
    pub folder: PathBuf,
    /// Extension without the leading dot (empty when none).
    pub extension: String,
    pub modified: DateTime<Utc>,
    /// Size in bytes.
    pub size: u64,
    pub mime_type: &'static str,
    pub content: Vec<u8>,
}

impl VaultFile {
    /// Build a file record, deriving name, folder, extension and mime type
    /// from `relative_path`.
    pub fn new(
        path: PathBuf,
        relative_path: PathBuf,
        modified: SystemTime,
        content: Vec<u8>,
    ) -> Self {
        let basename = relative_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder = relative_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let extension = relative_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_type_for(&extension);

        Self {
            path,
            relative_path,
            basename,
            folder,
            extension,
            modified: modified.into(),
            size: content.len() as u64,
            mime_type,
            content,
        }
    }

    /// Whether the extension matches one of `extensions` (case-insensitive,
    /// without dots).
    pub fn has_extension(&self, extensions: &[String]) -> bool {
        extension_matches(&self.extension, extensions)
    }
}

/// Case-insensitive extension check; entries in `extensions` may carry a dot.
pub fn extension_matches(extension: &str, extensions: &[String]) -> bool {
    !extension.is_empty()
        && extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
}

/// Extension of a `/`-separated relative path, without the dot.
pub fn path_extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => "",
        Some(pos) => &name[pos + 1..],
    }
}

fn mime_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "md" | "markdown" => "text/markdown",
        "txt" => "text/plain",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(relative: &str) -> VaultFile {
        VaultFile::new(
            Path::new("/vault").join(relative),
            PathBuf::from(relative),
            SystemTime::UNIX_EPOCH,
            b"# hi".to_vec(),
        )
    }

    #[test]
    fn test_metadata_derived_from_path() {
        let f = file("projects/meeting.md");
        assert_eq!(f.basename, "meeting");
        assert_eq!(f.folder, PathBuf::from("projects"));
        assert_eq!(f.extension, "md");
        assert_eq!(f.mime_type, "text/markdown");
        assert_eq!(f.size, 4);
    }

    #[test]
    fn test_root_file_has_empty_folder() {
        let f = file("index.md");
        assert_eq!(f.folder, PathBuf::new());
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        assert_eq!(file("blob.xyz").mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(file("Makefile").extension, "");
    }

    #[test]
    fn test_has_extension_ignores_case_and_dots() {
        let exts = vec![".MD".to_string(), "markdown".to_string()];
        assert!(file("a.md").has_extension(&exts));
        assert!(file("a.Markdown").has_extension(&exts));
        assert!(!file("a.txt").has_extension(&exts));
        assert!(!file("Makefile").has_extension(&exts));
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension("a/b/note.md"), "md");
        assert_eq!(path_extension("a.dir/README"), "");
        assert_eq!(path_extension("a/.hidden"), "");
    }
}
