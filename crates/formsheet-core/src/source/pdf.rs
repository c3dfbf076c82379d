//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{DocumentLoader, Result};
use crate::error::DocumentError;

/// PDF loader. Encrypted files are opened with the empty password.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfLoader;

fn unreadable(source_name: &str, reason: impl Into<String>) -> DocumentError {
    DocumentError::Unreadable {
        source_name: source_name.to_string(),
        reason: reason.into(),
    }
}

impl DocumentLoader for PdfLoader {
    fn extensions(&self) -> &[&'static str] {
        &["pdf"]
    }

    fn load_pages(&self, source_name: &str, data: &[u8]) -> Result<Vec<String>> {
        let mut doc = Document::load_mem(data).map_err(|e| unreadable(source_name, e.to_string()))?;

        let decrypted;
        let raw: &[u8] = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(unreadable(source_name, "encrypted PDF"));
            }
            debug!("Decrypted {} with empty password", source_name);

            // pdf-extract reads bytes, so hand it the decrypted document
            let mut buf = Vec::new();
            doc.save_to(&mut buf)
                .map_err(|e| unreadable(source_name, format!("failed to save decrypted PDF: {}", e)))?;
            decrypted = buf;
            &decrypted
        } else {
            data
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(unreadable(source_name, "PDF has no pages"));
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(raw)
            .map_err(|e| unreadable(source_name, e.to_string()))?;

        if pages.len() != page_count {
            warn!(
                "{}: extracted {} pages of text from {} pages",
                source_name,
                pages.len(),
                page_count
            );
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_unreadable() {
        let err = PdfLoader.load_pages("junk.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, DocumentError::Unreadable { .. }));
        assert_eq!(err.source_name(), "junk.pdf");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(PdfLoader.extensions(), &["pdf"]);
    }
}
