//! Per-document extraction result model.

use serde::{Deserialize, Serialize};

/// Which stage produced a field's final value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Field was not extracted.
    #[default]
    None,
    /// Deterministic pattern matching.
    Regex,
    /// Remote completion service.
    Ai,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::None => write!(f, "none"),
            Method::Regex => write!(f, "regex"),
            Method::Ai => write!(f, "ai"),
        }
    }
}

/// Per-field confidence scores in `[0, 1]`. An absent field scores 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub name: f32,
    pub email: f32,
    pub phone: f32,
}

/// Per-field provenance tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMethods {
    pub name: Method,
    pub email: Method,
    pub phone: Method,
}

/// The outcome of one document's pipeline run.
///
/// Created fresh per document, fully computed in one pass, immutable
/// afterwards. A non-fatal failure (AI credit exhaustion, timeout, …) is
/// recorded in `error` and never removes a regex-extracted field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Subject's full name, 1-5 whitespace-separated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address in `local@domain.tld` shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number with 8-12 digits after separator stripping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Per-field confidence scores.
    pub confidence: FieldConfidence,

    /// Per-field provenance.
    pub methods: FieldMethods,

    /// True iff any field's method is [`Method::Ai`].
    pub ai_used: bool,

    /// Advisory error message, if any stage failed non-fatally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Whether at least one contact field was extracted.
    pub fn has_any_field(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.phone.is_some()
    }

    /// Recompute `ai_used` from the provenance tags.
    pub(crate) fn sync_ai_used(&mut self) {
        self.ai_used = self.methods.name == Method::Ai
            || self.methods.email == Method::Ai
            || self.methods.phone == Method::Ai;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Method::None).unwrap(), "\"none\"");
        assert_eq!(serde_json::to_string(&Method::Regex).unwrap(), "\"regex\"");
        assert_eq!(serde_json::to_string(&Method::Ai).unwrap(), "\"ai\"");
    }

    #[test]
    fn test_default_result_is_empty() {
        let result = ExtractionResult::default();
        assert!(!result.has_any_field());
        assert_eq!(result.confidence.name, 0.0);
        assert_eq!(result.methods.name, Method::None);
        assert!(!result.ai_used);
    }

    #[test]
    fn test_sync_ai_used() {
        let mut result = ExtractionResult {
            phone: Some("0412 345 678".to_string()),
            ..Default::default()
        };
        result.methods.phone = Method::Ai;
        result.sync_ai_used();
        assert!(result.ai_used);

        result.methods.phone = Method::Regex;
        result.sync_ai_used();
        assert!(!result.ai_used);
    }

    #[test]
    fn test_absent_fields_skipped_in_json() {
        let result = ExtractionResult::default();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("name").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["methods"]["email"], "none");
    }
}
