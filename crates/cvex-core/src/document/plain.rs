//! Plain-text passthrough source, for `.txt` inputs and tests.

use crate::error::DocumentError;
use crate::models::config::DocumentConfig;

use super::{DocumentText, TextSource};

/// UTF-8 (lossy) passthrough document source.
pub struct PlainTextSource {
    config: DocumentConfig,
}

impl PlainTextSource {
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

impl Default for PlainTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSource for PlainTextSource {
    fn extract(&self, bytes: &[u8]) -> Result<DocumentText, DocumentError> {
        let text = String::from_utf8_lossy(bytes).into_owned();
        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(DocumentText::classify(text, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_passthrough() {
        let text = "Jane Doe\njane@corp.io\nled projects and teams across several offices \
                    with measurable delivery outcomes every quarter";
        let doc = PlainTextSource::new().extract(text.as_bytes()).unwrap();
        assert_eq!(doc.text, text);
        assert!(!doc.image_based);
    }

    #[test]
    fn test_empty_input() {
        let result = PlainTextSource::new().extract(b"   \n ");
        assert!(matches!(result, Err(DocumentError::Empty)));
    }
}
