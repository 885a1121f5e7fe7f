//! Document-to-text collaborators.
//!
//! Binary document parsing is not this crate's business: a [`TextSource`]
//! turns file bytes into plain text (flagging image-based documents), and the
//! implementations here are thin adapters over existing extractors. Anything
//! else (DOCX, a remote conversion service) plugs in behind the same trait.

mod pdf;
mod plain;

pub use pdf::PdfTextSource;
pub use plain::PlainTextSource;

use crate::error::DocumentError;
use crate::models::config::DocumentConfig;

/// Plain text recovered from a document.
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// Extracted text.
    pub text: String,
    /// True when the document appears to be scanned/rasterized: the text is
    /// too sparse to be machine-readable prose.
    pub image_based: bool,
}

impl DocumentText {
    /// Build from raw text, classifying sparse output as image-based.
    pub fn classify(text: String, config: &DocumentConfig) -> Self {
        let words = text.split_whitespace().count();
        let chars = text.trim().chars().count();
        let image_based = words < config.min_words || chars < config.min_chars;
        Self { text, image_based }
    }
}

/// A document-to-text collaborator.
pub trait TextSource {
    /// Extract plain text from document bytes.
    ///
    /// Must fail with a distinguishable [`DocumentError`] when the format is
    /// unsupported or the bytes are corrupt.
    fn extract(&self, bytes: &[u8]) -> Result<DocumentText, DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_prose_text() {
        let text = "Jane Doe\njane@corp.io\n".to_string()
            + &"Led a team of engineers building data pipelines across two regions. ".repeat(4);
        let doc = DocumentText::classify(text, &DocumentConfig::default());
        assert!(!doc.image_based);
    }

    #[test]
    fn test_classify_sparse_text_as_image_based() {
        let doc = DocumentText::classify("J D\n0412".to_string(), &DocumentConfig::default());
        assert!(doc.image_based);
    }

    #[test]
    fn test_classify_empty() {
        let doc = DocumentText::classify(String::new(), &DocumentConfig::default());
        assert!(doc.image_based);
        assert_eq!(doc.text, "");
    }
}
