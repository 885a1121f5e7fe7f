//! Configuration structures for the extraction pipeline.
//!
//! The line cutoffs and token bounds below are empirical: they are tuned for
//! one-page, English-language résumés with Australian phone formats. They are
//! configuration rather than hard-coded so they can be regionalized.

use serde::{Deserialize, Serialize};

/// Main configuration for the cvex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CvexConfig {
    /// Regex-stage heuristics.
    pub extraction: ExtractionConfig,

    /// AI fallback/validator configuration.
    pub ai: AiConfig,

    /// Document source configuration.
    pub document: DocumentConfig,
}

/// Which pipeline variant drives the AI stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPriority {
    /// Always consult the model for the name and validate the phone choice;
    /// email stays regex-authoritative.
    #[default]
    AiAlways,
    /// Trust regex results and issue one combined extraction call only for
    /// fields regex left empty.
    RegexFirst,
}

/// Regex-stage heuristic thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines scanned for a name at the top of the document.
    pub name_scan_lines: usize,

    /// Maximum length of a line still considered a name candidate.
    pub name_max_line_len: usize,

    /// Maximum digits a name candidate line may contain.
    pub name_max_digits: usize,

    /// Minimum tokens in an accepted name.
    pub name_min_tokens: usize,

    /// Maximum tokens in an accepted name.
    pub name_max_tokens: usize,

    /// An email found within this many lines counts as header-positioned.
    pub email_header_lines: usize,

    /// Phones found within this many lines are in the contact block.
    pub phone_contact_lines: usize,

    /// Phones found between the contact block and this line score mid-range.
    pub phone_mid_lines: usize,

    /// Context window lines before a phone occurrence.
    pub context_lines_before: usize,

    /// Context window lines after a phone occurrence.
    pub context_lines_after: usize,

    /// Minimum digits for a valid phone candidate.
    pub phone_min_digits: usize,

    /// Maximum digits for a valid phone candidate.
    pub phone_max_digits: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            name_scan_lines: 12,
            name_max_line_len: 55,
            name_max_digits: 2,
            name_min_tokens: 1,
            name_max_tokens: 4,
            email_header_lines: 15,
            phone_contact_lines: 10,
            phone_mid_lines: 15,
            context_lines_before: 3,
            context_lines_after: 2,
            phone_min_digits: 8,
            phone_max_digits: 12,
        }
    }
}

/// AI fallback/validator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Use the completion service when a credential is configured.
    pub enabled: bool,

    /// Completion model identifier.
    pub model: String,

    /// Base URL of the completion endpoint.
    pub base_url: String,

    /// Maximum completion length in tokens.
    pub max_tokens: u32,

    /// Timeout for text requests, in seconds.
    pub text_timeout_secs: u64,

    /// Timeout for vision requests, in seconds.
    pub vision_timeout_secs: u64,

    /// Pipeline variant selection.
    pub field_priority: FieldPriority,

    /// Allow the combined regex-first call to fill a missing email.
    pub ai_email: bool,

    /// Send image-based documents to the vision endpoint.
    pub vision: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "anthropic/claude-sonnet-4".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            max_tokens: 200,
            text_timeout_secs: 30,
            vision_timeout_secs: 60,
            field_priority: FieldPriority::default(),
            ai_email: false,
            vision: true,
        }
    }
}

/// Document source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Below this many words the text is considered image-based.
    pub min_words: usize,

    /// Below this many characters the text is considered image-based.
    pub min_chars: usize,

    /// Pages of a PDF to extract text from (contact details live up front).
    pub max_pdf_pages: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            min_words: 15,
            min_chars: 100,
            max_pdf_pages: 2,
        }
    }
}

impl CvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_round_trip() {
        let config = CvexConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: CvexConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extraction.phone_contact_lines, 10);
        assert_eq!(back.ai.field_priority, FieldPriority::AiAlways);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CvexConfig =
            serde_json::from_str(r#"{"ai": {"field_priority": "regex_first"}}"#).unwrap();
        assert_eq!(config.ai.field_priority, FieldPriority::RegexFirst);
        assert_eq!(config.ai.text_timeout_secs, 30);
        assert_eq!(config.extraction.name_scan_lines, 12);
    }
}
