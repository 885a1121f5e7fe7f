//! Common regex patterns and lexical cues for résumé contact extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Email pattern (local@domain.tld, TLD at least 2 chars)
    pub static ref EMAIL: Regex = Regex::new(
        r"(?i)[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    // Phone patterns in priority order: Australian mobile first, then
    // Australian landline, North American, generic international last.
    // The first pattern that matches wins for a given candidate.
    pub static ref PHONE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\+61\s?4\d{2}[\s-]?\d{3}[\s-]?\d{3}").unwrap(),
        Regex::new(r"04\d{2}[\s-]?\d{3}[\s-]?\d{3}").unwrap(),
        Regex::new(r"04\d{8}").unwrap(),
        Regex::new(r"\+61\s?[2-478][\s-]?\d{4}[\s-]?\d{4}").unwrap(),
        Regex::new(r"0[2-478][\s-]?\d{4}[\s-]?\d{4}").unwrap(),
        Regex::new(r"\(\+?61\)\s?4\d{2}[\s-]?\d{3}[\s-]?\d{3}").unwrap(),
        Regex::new(r"\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap(),
        Regex::new(r"\+\d{1,3}[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,9}").unwrap(),
    ];

    // Runs of whitespace/hyphens inside a matched phone number
    pub static ref PHONE_SEPARATORS: Regex = Regex::new(r"[\s-]+").unwrap();

    // A phone-shaped span inside free-form model output
    pub static ref PHONE_SPAN: Regex = Regex::new(r"[\d\s\-\+\(\)]{8,}").unwrap();
}

/// Keywords that label a phone number as the subject's own contact detail.
pub const PHONE_CONTEXT_KEYWORDS: &[&str] = &[
    "phone", "mobile", "cell", "tel", "contact", "call", "mob", "ph",
];

/// Keywords indicating a number or name belongs to a third party.
pub const REFERENCE_KEYWORDS: &[&str] = &[
    "reference",
    "referee",
    "supervisor",
    "manager",
    "employer",
    "contact person",
    "reporting to",
    "reports to",
    "superior",
    "boss",
    "hr",
    "human resource",
];

/// Section headers that disqualify a line as a name candidate.
pub const SKIP_WORDS: &[&str] = &[
    "curriculum vitae",
    "curriculum",
    "resume",
    "objective",
    "summary",
    "profile",
    "experience",
    "employment",
    "education",
    "qualifications",
    "skills",
    "references",
    "referees",
    "contact",
    "address",
    "achievements",
    "certifications",
    "projects",
];

/// Honorific prefixes stripped before name-shape checks.
pub const HONORIFICS: &[&str] = &["mr", "mrs", "ms", "miss", "dr", "prof", "mx"];

/// Email domains/fragments that mark a placeholder rather than a real address.
pub const PLACEHOLDER_DOMAINS: &[&str] = &["example.com", "test.com", "sample."];

/// Strip all separators commonly found in phone numbers, leaving digits only.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL.is_match("jane.doe@company.com.au"));
        assert!(EMAIL.is_match("JANE@CORP.IO"));
        assert!(!EMAIL.is_match("jane.doe@company"));
        assert!(!EMAIL.is_match("not an email"));
    }

    #[test]
    fn test_au_mobile_matches_first() {
        let text = "Mobile: 0412 345 678";
        let matched = PHONE_PATTERNS.iter().find_map(|p| p.find(text));
        assert_eq!(matched.unwrap().as_str(), "0412 345 678");
    }

    #[test]
    fn test_international_fallback() {
        let text = "Tel: +44 20 7946 0958";
        let matched = PHONE_PATTERNS.iter().find_map(|p| p.find(text));
        assert!(matched.is_some());
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(phone_digits("+61 412-345-678"), "61412345678");
        assert_eq!(phone_digits("(02) 9876 5432"), "0298765432");
    }
}
