//! Email extraction.
//!
//! Email is the one field regex handles reliably on its own: the pattern is
//! unambiguous and placeholder addresses are the only real false-positive
//! source, so the extracted value is authoritative for the pipeline.

use crate::models::config::ExtractionConfig;

use super::RuleMatch;
use super::patterns::{EMAIL, PLACEHOLDER_DOMAINS};

/// Confidence when the first occurrence sits in the document header.
const CONF_HEADER: f32 = 0.95;
/// Confidence when the first occurrence is further down.
const CONF_BODY: f32 = 0.8;
/// Confidence when a valid match cannot be located on any line.
const CONF_UNPOSITIONED: f32 = 0.85;
/// Confidence when only placeholder-filtered matches exist.
const CONF_PLACEHOLDER_ONLY: f32 = 0.6;

/// Email field extractor.
pub struct EmailExtractor {
    header_lines: usize,
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self { header_lines: 15 }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            header_lines: config.email_header_lines,
        }
    }

    /// Extract the first valid email address from the text.
    pub fn extract(&self, text: &str) -> Option<RuleMatch> {
        let matches: Vec<&str> = EMAIL.find_iter(text).map(|m| m.as_str()).collect();

        for candidate in &matches {
            let lower = candidate.to_lowercase();
            if PLACEHOLDER_DOMAINS.iter().any(|d| lower.contains(d)) {
                continue;
            }

            if !has_valid_domain(candidate) {
                continue;
            }

            // Line position of the first occurrence drives the confidence
            for (idx, line) in text.lines().enumerate() {
                if line.to_lowercase().contains(&lower) {
                    let confidence = if idx < self.header_lines {
                        CONF_HEADER
                    } else {
                        CONF_BODY
                    };
                    return Some(RuleMatch::new(*candidate, confidence).at_line(idx));
                }
            }
            return Some(RuleMatch::new(*candidate, CONF_UNPOSITIONED));
        }

        // Nothing survived filtering; report the first raw match as a weak signal
        matches
            .first()
            .map(|m| RuleMatch::new(*m, CONF_PLACEHOLDER_ONLY))
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn has_valid_domain(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let _local = parts.next();
    let Some(domain) = parts.next() else {
        return false;
    };
    domain
        .rsplit('.')
        .next()
        .is_some_and(|tld| tld.len() >= 2 && domain.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_email_high_confidence() {
        let text = "John Smith\njohn.smith@email.com\n0412 345 678";
        let m = EmailExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "john.smith@email.com");
        assert_eq!(m.confidence, 0.95);
        assert_eq!(m.line, Some(1));
    }

    #[test]
    fn test_body_email_lower_confidence() {
        let mut text = "Header\n".repeat(20);
        text.push_str("reach me at jane@company.org\n");
        let m = EmailExtractor::new().extract(&text).unwrap();
        assert_eq!(m.value, "jane@company.org");
        assert_eq!(m.confidence, 0.8);
    }

    #[test]
    fn test_placeholder_skipped_for_real_address() {
        let text = "demo@example.com\nreal.person@workplace.net";
        let m = EmailExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "real.person@workplace.net");
    }

    #[test]
    fn test_placeholder_only_is_weak() {
        let text = "contact: demo@example.com";
        let m = EmailExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "demo@example.com");
        assert_eq!(m.confidence, 0.6);
    }

    #[test]
    fn test_no_email() {
        assert!(EmailExtractor::new().extract("no address here").is_none());
    }

    #[test]
    fn test_extracted_value_always_has_dotted_domain() {
        // Shape invariant: anything returned contains '@' and a TLD >= 2 chars
        let samples = [
            "a@b.co",
            "weird text a.b@c.d.example.io trailing",
            "x@y",
            "only words",
        ];
        for text in samples {
            if let Some(m) = EmailExtractor::new().extract(text) {
                if m.confidence > 0.6 {
                    assert!(m.value.contains('@'));
                    let domain = m.value.rsplit('@').next().unwrap();
                    let tld = domain.rsplit('.').next().unwrap();
                    assert!(tld.len() >= 2, "bad tld in {}", m.value);
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let text = "Jane Doe\njane@company.org";
        let extractor = EmailExtractor::new();
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
