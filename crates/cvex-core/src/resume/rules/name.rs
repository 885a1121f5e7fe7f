//! Name extraction from the document header.
//!
//! Names are the least pattern-shaped field, so the rule is a line filter:
//! scan the top of the document, drop lines that cannot be a person's name
//! (section headers, emails, long lines, digit-heavy lines) and accept the
//! first line whose tokens look name-shaped. When the header yields nothing,
//! a name is derived from the email local-part.

use crate::models::config::ExtractionConfig;

use super::RuleMatch;
use super::patterns::{EMAIL, HONORIFICS, SKIP_WORDS};

/// Confidence for a name taken from a header line.
const CONF_HEADER_LINE: f32 = 0.85;
/// Confidence for a name derived from the email local-part.
const CONF_EMAIL_DERIVED: f32 = 0.55;

/// Name field extractor.
pub struct NameExtractor {
    config: ExtractionConfig,
}

impl NameExtractor {
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Extract the subject's name from the top of the document.
    pub fn extract(&self, text: &str) -> Option<RuleMatch> {
        for (idx, line) in text.lines().take(self.config.name_scan_lines).enumerate() {
            let line = line.trim();
            if line.is_empty()
                || line.len() > self.config.name_max_line_len
                || EMAIL.is_match(line)
                || digit_count(line) > self.config.name_max_digits
                || is_section_header(line)
            {
                continue;
            }

            if let Some(name) = self.accept_line(line) {
                return Some(RuleMatch::new(name, CONF_HEADER_LINE).at_line(idx));
            }
        }

        self.from_email_local_part(text)
            .map(|name| RuleMatch::new(name, CONF_EMAIL_DERIVED))
    }

    /// Check a candidate line's tokens for name shape.
    fn accept_line(&self, line: &str) -> Option<String> {
        let stripped = strip_honorific(line);
        let tokens: Vec<&str> = stripped.split_whitespace().collect();

        if tokens.len() < self.config.name_min_tokens
            || tokens.len() > self.config.name_max_tokens
        {
            return None;
        }

        if tokens.iter().all(|t| is_name_token(t)) {
            Some(tokens.join(" "))
        } else {
            None
        }
    }

    /// Derive a name from the email local-part: split on digits and
    /// separators, capitalize the segments, require at least two of them.
    fn from_email_local_part(&self, text: &str) -> Option<String> {
        let email = EMAIL.find(text)?.as_str();
        let local = email.split('@').next()?;

        let segments: Vec<String> = local
            .split(|c: char| c.is_ascii_digit() || c == '.' || c == '_' || c == '-')
            .filter(|s| !s.is_empty())
            .map(capitalize)
            .collect();

        if segments.len() >= 2 {
            Some(segments.join(" "))
        } else {
            None
        }
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn digit_count(line: &str) -> usize {
    line.chars().filter(|c| c.is_ascii_digit()).count()
}

fn is_section_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    SKIP_WORDS.iter().any(|w| lower.contains(w))
}

/// Drop a leading honorific (with or without a trailing dot).
fn strip_honorific(line: &str) -> &str {
    let mut tokens = line.splitn(2, char::is_whitespace);
    let first = tokens.next().unwrap_or("");
    let rest = tokens.next().unwrap_or("");

    let normalized = first.trim_end_matches('.').to_lowercase();
    if !rest.is_empty() && HONORIFICS.contains(&normalized.as_str()) {
        rest.trim_start()
    } else {
        line
    }
}

/// A token is name-shaped if it is alphabetic (internal hyphens and
/// apostrophes allowed) with an uppercase initial, or fully uppercase.
fn is_name_token(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !token.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'') {
        return false;
    }

    if first.is_uppercase() {
        return true;
    }

    token.chars().count() > 1 && token.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_name() {
        let text = "John Smith\njohn.smith@email.com\n0412 345 678";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "John Smith");
        assert_eq!(m.confidence, 0.85);
        assert_eq!(m.line, Some(0));
    }

    #[test]
    fn test_uppercase_name_accepted() {
        let text = "JANE O'BRIEN\nSoftware Engineer";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "JANE O'BRIEN");
    }

    #[test]
    fn test_hyphenated_name() {
        let text = "Anne-Marie Taylor-Wood\nanne@work.net";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "Anne-Marie Taylor-Wood");
    }

    #[test]
    fn test_honorific_stripped() {
        let text = "Dr. Sarah Connor\nsarah@lab.org";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "Sarah Connor");
    }

    #[test]
    fn test_section_header_never_a_name() {
        for header in ["Experience", "Skills", "Curriculum Vitae", "References"] {
            let text = format!("{}\n\nJob history follows", header);
            let result = NameExtractor::new().extract(&text);
            assert!(
                result.is_none() || result.as_ref().unwrap().value != *header,
                "{header:?} was returned as a name"
            );
        }
    }

    #[test]
    fn test_skips_digit_heavy_and_long_lines() {
        let text = "+61 412 345 678\n\
                    A very long line that could not possibly be anyone's actual name at all\n\
                    Mary Jones";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "Mary Jones");
    }

    #[test]
    fn test_job_title_line_rejected() {
        // lowercase connective breaks the token-shape rule
        let text = "Senior developer of platforms\nfirst.last@company.com";
        let m = NameExtractor::new().extract(text).unwrap();
        // falls through to the email local-part
        assert_eq!(m.value, "First Last");
        assert_eq!(m.confidence, 0.55);
    }

    #[test]
    fn test_email_fallback_requires_two_segments() {
        let text = "admin@company.com";
        assert!(NameExtractor::new().extract(text).is_none());
    }

    #[test]
    fn test_email_fallback_splits_digits() {
        let text = "\njane99doe@mail.net";
        let m = NameExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "Jane Doe");
    }

    #[test]
    fn test_scan_window_bounds() {
        let mut text = "irrelevant header line with numbers 12345\n".repeat(15);
        text.push_str("Late Name\n");
        // The name sits past the scan window and there is no email to fall
        // back on, so nothing is extracted
        assert!(NameExtractor::new().extract(&text).is_none());
    }
}
