//! Tolerant parsing of completion responses.
//!
//! A completion that is empty, the `NOT_FOUND` sentinel, or unparsable JSON
//! means "field not found" rather than an error; only the transport layer
//! produces [`crate::AiError`] values.

use serde::Deserialize;

use crate::prompts::NOT_FOUND;

/// Contact fields parsed from a combined JSON completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AiContact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// Strip an optional markdown code fence from around a completion.
pub fn strip_code_fences(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Interpret a single-field completion.
///
/// Returns `None` for empty output, the sentinel, or sentinel-like wrapping
/// (quotes the model sometimes adds around its answer are removed).
pub fn parse_field(raw: &str) -> Option<String> {
    let cleaned = strip_code_fences(raw)
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();

    if cleaned.is_empty() || cleaned == NOT_FOUND {
        return None;
    }
    Some(cleaned.to_string())
}

/// Interpret a combined JSON completion.
///
/// Unparsable content yields an empty [`AiContact`]; JSON nulls and sentinel
/// strings both map to absent fields.
pub fn parse_contact(raw: &str) -> AiContact {
    #[derive(Deserialize)]
    struct Wire {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        phone: Option<String>,
    }

    let cleaned = strip_code_fences(raw);
    let wire: Wire = match serde_json::from_str(cleaned) {
        Ok(w) => w,
        Err(_) => return AiContact::default(),
    };

    AiContact {
        name: wire.name.as_deref().and_then(parse_field),
        email: wire.email.as_deref().and_then(parse_field),
        phone: wire.phone.as_deref().and_then(parse_field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_field_plain() {
        assert_eq!(parse_field("John Smith"), Some("John Smith".to_string()));
    }

    #[test]
    fn test_parse_field_strips_quotes() {
        assert_eq!(parse_field("\"John Smith\"\n"), Some("John Smith".to_string()));
    }

    #[test]
    fn test_parse_field_sentinel() {
        assert_eq!(parse_field("NOT_FOUND"), None);
        assert_eq!(parse_field("\"NOT_FOUND\""), None);
        assert_eq!(parse_field("   "), None);
    }

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```json\n{\"name\": \"Jane\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"name\": \"Jane\"}");
        assert_eq!(strip_code_fences("plain"), "plain");
    }

    #[test]
    fn test_parse_contact_full() {
        let raw = r#"{"name": "Jane Doe", "email": "jane@corp.io", "phone": "0412 345 678"}"#;
        let contact = parse_contact(raw);
        assert_eq!(contact.name, Some("Jane Doe".to_string()));
        assert_eq!(contact.email, Some("jane@corp.io".to_string()));
        assert_eq!(contact.phone, Some("0412 345 678".to_string()));
    }

    #[test]
    fn test_parse_contact_nulls_and_sentinels() {
        let raw = r#"{"name": "NOT_FOUND", "email": null, "phone": "0412 345 678"}"#;
        let contact = parse_contact(raw);
        assert_eq!(contact.name, None);
        assert_eq!(contact.email, None);
        assert_eq!(contact.phone, Some("0412 345 678".to_string()));
    }

    #[test]
    fn test_parse_contact_fenced() {
        let raw = "```json\n{\"name\": \"Jane Doe\", \"email\": null, \"phone\": null}\n```";
        let contact = parse_contact(raw);
        assert_eq!(contact.name, Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_parse_contact_unparsable_is_not_found() {
        let contact = parse_contact("I could not find any contact details.");
        assert!(contact.is_empty());
    }
}
