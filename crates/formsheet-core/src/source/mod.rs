//! Loading source documents as text.
//!
//! Sources are picked by extension: `.txt` files are read as-is, `.pdf`
//! files go through [`PdfLoader`] when the `pdf` feature is enabled.

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DocumentError;
use crate::models::record::RawDocument;

/// Result type for source loading.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Turns the bytes of one source into per-page text.
pub trait DocumentLoader {
    /// Extensions (lowercase, without the dot) this loader handles.
    fn extensions(&self) -> &[&'static str];

    /// Extract the text of every page.
    fn load_pages(&self, source_name: &str, data: &[u8]) -> Result<Vec<String>>;
}

/// Loader for plain text sources. The whole file is one page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }

    fn load_pages(&self, source_name: &str, data: &[u8]) -> Result<Vec<String>> {
        let text = String::from_utf8(data.to_vec()).map_err(|e| DocumentError::Unreadable {
            source_name: source_name.to_string(),
            reason: format!("not valid UTF-8: {}", e),
        })?;
        Ok(vec![text])
    }
}

/// Reads source files and flattens them into [`RawDocument`]s.
pub struct SourceReader {
    loaders: Vec<Box<dyn DocumentLoader + Send + Sync>>,
    page_marker: String,
}

impl SourceReader {
    /// Reader with every loader compiled into this build.
    pub fn new(page_marker: impl Into<String>) -> Self {
        let mut loaders: Vec<Box<dyn DocumentLoader + Send + Sync>> = vec![Box::new(TextLoader)];
        #[cfg(feature = "pdf")]
        loaders.push(Box::new(PdfLoader));

        Self {
            loaders,
            page_marker: page_marker.into(),
        }
    }

    /// Whether some loader handles `extension`.
    pub fn supports(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.loaders
            .iter()
            .any(|l| l.extensions().contains(&extension.as_str()))
    }

    /// Load a file. The source name is the file name.
    pub fn load(&self, path: &Path) -> Result<RawDocument> {
        let source_name = source_name(path);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let loader = self
            .loaders
            .iter()
            .find(|l| l.extensions().contains(&extension.as_str()))
            .ok_or_else(|| DocumentError::Unsupported {
                source_name: source_name.clone(),
                extension: extension.clone(),
            })?;

        let data = std::fs::read(path).map_err(|e| DocumentError::Unreadable {
            source_name: source_name.clone(),
            reason: e.to_string(),
        })?;

        let pages = loader.load_pages(&source_name, &data)?;
        debug!("Loaded {} ({} pages)", source_name, pages.len());
        Ok(RawDocument::from_pages(source_name, pages, &self.page_marker))
    }
}

/// Display name of a source path.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// List the files in `dir` with one of `extensions`, ordered by file name.
///
/// The listing is not recursive. Extension matching ignores case.
pub fn discover_sources<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> std::io::Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|x| x.as_ref().eq_ignore_ascii_case(e)));
        if matches {
            sources.push(path);
        }
    }

    sort_sources(&mut sources);
    debug!("Found {} sources in {}", sources.len(), dir.display());
    Ok(sources)
}

/// Order paths lexicographically by source name, then by full path.
pub fn sort_sources(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| source_name(a).cmp(&source_name(b)).then_with(|| a.cmp(b)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.PDF", "c.txt", "notes.md"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("d.txt")).unwrap();

        let found = discover_sources(dir.path(), &["pdf", "txt"]).unwrap();
        let names: Vec<String> = found.iter().map(|p| source_name(p)).collect();
        assert_eq!(names, vec!["a.PDF", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.txt");
        fs::write(&path, "Name: Jane Doe\nEmail: jane@example.com\n").unwrap();

        let doc = SourceReader::new("\n").load(&path).unwrap();
        assert_eq!(doc.source, "form.txt");
        assert_eq!(doc.page_count, 1);
        assert!(doc.text.contains("jane@example.com"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.docx");
        fs::write(&path, "x").unwrap();

        let err = SourceReader::new("\n").load(&path).unwrap_err();
        assert_eq!(
            err,
            DocumentError::Unsupported {
                source_name: "form.docx".to_string(),
                extension: "docx".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceReader::new("\n").load(&dir.path().join("gone.txt")).unwrap_err();
        assert!(matches!(err, DocumentError::Unreadable { .. }));
        assert_eq!(err.source_name(), "gone.txt");
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let err = SourceReader::new("\n").load(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Unreadable { .. }));
    }

    #[test]
    fn test_supports() {
        let reader = SourceReader::new("\n");
        assert!(reader.supports("TXT"));
        assert!(!reader.supports("docx"));
    }
}
