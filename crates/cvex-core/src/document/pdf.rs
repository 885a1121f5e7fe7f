//! PDF text extraction adapter over lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use crate::error::DocumentError;
use crate::models::config::DocumentConfig;

use super::{DocumentText, TextSource};

/// PDF document source.
///
/// lopdf does the structural work: corruption and encryption surface as
/// distinguishable failures, and text comes from the first pages only since
/// contact details live up front. pdf-extract is the fallback when lopdf's
/// text extraction comes back empty.
pub struct PdfTextSource {
    config: DocumentConfig,
}

impl PdfTextSource {
    pub fn new() -> Self {
        Self {
            config: DocumentConfig::default(),
        }
    }

    pub fn from_config(config: &DocumentConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Default for PdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PdfTextSource {
    fn extract(&self, bytes: &[u8]) -> Result<DocumentText, DocumentError> {
        let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(DocumentError::Unsupported("encrypted PDF".to_string()));
        }

        let pages: Vec<u32> = doc
            .get_pages()
            .keys()
            .copied()
            .take(self.config.max_pdf_pages)
            .collect();
        if pages.is_empty() {
            return Err(DocumentError::Empty);
        }

        let text = match doc.extract_text(&pages) {
            Ok(t) if !t.trim().is_empty() => t,
            other => {
                if let Err(e) = other {
                    debug!("lopdf text extraction failed, trying pdf-extract: {}", e);
                }
                pdf_extract::extract_text_from_mem(bytes)
                    .map_err(|e| DocumentError::Parse(e.to_string()))?
            }
        };

        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }

        Ok(DocumentText::classify(text, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let result = PdfTextSource::new().extract(b"definitely not a pdf");
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_empty_bytes_are_a_parse_error() {
        let result = PdfTextSource::new().extract(&[]);
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }
}
