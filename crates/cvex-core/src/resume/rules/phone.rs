//! Phone candidate extraction and context-based disambiguation.
//!
//! A résumé routinely carries several phone numbers: the subject's own plus
//! referee, supervisor or employer numbers near the bottom. Candidates are
//! harvested with the full pattern table, then each one is scored by where it
//! first appears and what surrounds it.

use tracing::debug;

use crate::models::config::ExtractionConfig;

use super::RuleMatch;
use super::patterns::{
    PHONE_CONTEXT_KEYWORDS, PHONE_PATTERNS, PHONE_SEPARATORS, REFERENCE_KEYWORDS, phone_digits,
};

/// Score for a candidate whose context window names a third party.
const CONF_REFERENCE: f32 = 0.15;
/// Score for a contact-block candidate with a phone-label keyword nearby.
const CONF_LABELED: f32 = 0.85;
/// Score for a contact-block candidate without a label keyword.
const CONF_CONTACT_BLOCK: f32 = 0.7;
/// Score for a candidate in the mid section of the document.
const CONF_MID: f32 = 0.55;
/// Score for a candidate deep in the document (or never located on a line).
const CONF_TAIL: f32 = 0.4;
/// Score when every candidate was rejected and the first is returned anyway.
const CONF_LAST_RESORT: f32 = 0.35;

/// A phone number candidate awaiting disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneCandidate {
    /// Normalized value: separator runs collapsed to single spaces.
    pub value: String,
    /// Line index of the first occurrence, if located.
    pub line: Option<usize>,
}

/// Phone field extractor with context disambiguation.
pub struct PhoneExtractor {
    config: ExtractionConfig,
}

impl PhoneExtractor {
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

    /// Harvest all phone number candidates from the text.
    ///
    /// Patterns are applied in priority order over the whole text. Values are
    /// normalized (separator runs become single spaces) and deduplicated on
    /// their digit-only form, so differently formatted variants of one
    /// physical number collapse into the first formatting seen. Candidates
    /// outside the valid digit-count range are discarded.
    pub fn candidates(&self, text: &str) -> Vec<PhoneCandidate> {
        let lines: Vec<&str> = text.lines().collect();
        let mut seen_digits: Vec<String> = Vec::new();
        let mut candidates = Vec::new();

        for pattern in PHONE_PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                let value = PHONE_SEPARATORS.replace_all(m.as_str(), " ").trim().to_string();
                let digits = phone_digits(&value);

                if digits.len() < self.config.phone_min_digits
                    || digits.len() > self.config.phone_max_digits
                {
                    continue;
                }
                if seen_digits.contains(&digits) {
                    continue;
                }

                let line = find_line(&lines, &digits);
                seen_digits.push(digits);
                candidates.push(PhoneCandidate { value, line });
            }
        }

        candidates
    }

    /// Score one candidate by position and surrounding context.
    ///
    /// Returns `(accepted, confidence)`: a rejected candidate (reference
    /// context) scores [`CONF_REFERENCE`] and only survives if nothing else
    /// does.
    pub fn score(&self, text: &str, candidate: &PhoneCandidate) -> (bool, f32) {
        let lines: Vec<&str> = text.lines().collect();

        let Some(idx) = candidate.line.or_else(|| find_line(&lines, &phone_digits(&candidate.value)))
        else {
            return (true, CONF_TAIL);
        };

        let start = idx.saturating_sub(self.config.context_lines_before);
        let end = (idx + self.config.context_lines_after).min(lines.len());
        let context = lines[start..end].join(" ").to_lowercase();

        if REFERENCE_KEYWORDS.iter().any(|kw| context.contains(kw)) {
            return (false, CONF_REFERENCE);
        }

        if idx < self.config.phone_contact_lines {
            if PHONE_CONTEXT_KEYWORDS.iter().any(|kw| context.contains(kw)) {
                (true, CONF_LABELED)
            } else {
                (true, CONF_CONTACT_BLOCK)
            }
        } else if idx < self.config.phone_mid_lines {
            (true, CONF_MID)
        } else {
            (true, CONF_TAIL)
        }
    }

    /// Extract the phone number most likely to belong to the document subject.
    pub fn extract(&self, text: &str) -> Option<RuleMatch> {
        let candidates = self.candidates(text);
        if candidates.is_empty() {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let (accepted, confidence) = self.score(text, candidate);
            debug!(
                "phone candidate {:?}: accepted={} confidence={:.2}",
                candidate.value, accepted, confidence
            );
            if accepted && best.map_or(true, |(_, c)| confidence > c) {
                best = Some((i, confidence));
            }
        }

        match best {
            Some((i, confidence)) => {
                let mut m = RuleMatch::new(candidates[i].value.clone(), confidence);
                m.line = candidates[i].line;
                Some(m)
            }
            // Everything sat in a reference context; degraded signal, not an error
            None => Some(RuleMatch::new(candidates[0].value.clone(), CONF_LAST_RESORT)),
        }
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate the first line whose digit content contains the candidate's digits.
fn find_line(lines: &[&str], digits: &str) -> Option<usize> {
    lines
        .iter()
        .position(|line| phone_digits(line).contains(digits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_candidates_normalized_and_deduped() {
        let text = "Mobile: 0412-345-678\nAlt: 0412 345 678\nHome: 02 9876 5432";
        let candidates = PhoneExtractor::new().candidates(text);
        let values: Vec<&str> = candidates.iter().map(|c| c.value.as_str()).collect();
        assert!(values.contains(&"0412 345 678"));
        assert!(values.contains(&"02 9876 5432"));
        // The hyphenated and spaced forms are one physical number
        assert_eq!(
            candidates
                .iter()
                .filter(|c| phone_digits(&c.value) == "0412345678")
                .count(),
            1
        );
    }

    #[test]
    fn test_candidates_digit_count_bounds() {
        let text = "0412 345 678 and +61 2 9876 5432 and 123 456";
        for c in PhoneExtractor::new().candidates(text) {
            let n = phone_digits(&c.value).len();
            assert!((8..=12).contains(&n), "{} has {} digits", c.value, n);
        }
    }

    #[test]
    fn test_reference_context_rejected() {
        let text = "\
Jane Candidate
Mobile: 0412 345 678

Experience
...

References:
John Referee, Manager
02 9876 5432";
        let extractor = PhoneExtractor::new();
        let reference = PhoneCandidate {
            value: "02 9876 5432".to_string(),
            line: None,
        };
        let own = PhoneCandidate {
            value: "0412 345 678".to_string(),
            line: None,
        };

        let (accepted, conf) = extractor.score(text, &reference);
        assert!(!accepted);
        assert_eq!(conf, 0.15);

        let (accepted, conf) = extractor.score(text, &own);
        assert!(accepted);
        // Monotonicity: a contact-block candidate strictly outscores a
        // reference-context candidate
        assert!(conf >= 0.7);
        assert!(conf > 0.15);
    }

    #[test]
    fn test_labeled_contact_block_scores_highest() {
        let text = "Jane Candidate\nMobile: 0412 345 678";
        let extractor = PhoneExtractor::new();
        let m = extractor.extract(text).unwrap();
        assert_eq!(m.value, "0412 345 678");
        assert_eq!(m.confidence, 0.85);
    }

    #[test]
    fn test_unlabeled_contact_block() {
        let text = "Jane Candidate\n0412 345 678";
        let m = PhoneExtractor::new().extract(text).unwrap();
        assert_eq!(m.confidence, 0.7);
    }

    #[test]
    fn test_subject_phone_beats_reference_number() {
        let mut text = String::from("Jane Candidate\nMobile: 0412 345 678\n");
        text.push_str(&"\n".repeat(20));
        text.push_str("References: John Referee, 02 9876 5432\n");

        let m = PhoneExtractor::new().extract(&text).unwrap();
        assert_eq!(m.value, "0412 345 678");
    }

    #[test]
    fn test_all_rejected_falls_back_to_first() {
        let text = "Referee contact\nSupervisor: John Boss\nPhone: 02 9876 5432";
        let m = PhoneExtractor::new().extract(text).unwrap();
        assert_eq!(m.value, "02 9876 5432");
        assert_eq!(m.confidence, 0.35);
    }

    #[test]
    fn test_no_candidates() {
        assert!(PhoneExtractor::new().extract("no numbers here").is_none());
    }

    #[test]
    fn test_idempotent() {
        let text = "Jane\nMobile: 0412 345 678\nRef: 02 9876 5432";
        let extractor = PhoneExtractor::new();
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
