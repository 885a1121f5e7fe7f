//! Explicit extraction log sink.
//!
//! The log is an append-only record owned by the caller and passed into the
//! pipeline, so there is no process-wide logger state shared between
//! documents. One `ExtractionLog` per document (or per batch, at the caller's
//! choice) accumulates stage-by-stage entries for later display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::result::{ExtractionResult, Method};

/// A single logged pipeline event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    /// Pipeline stage, e.g. `extract_email`, `ai_name`, `complete`.
    pub stage: String,
    pub success: bool,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.success { "ok" } else { "fail" };
        write!(
            f,
            "[{}] {:<4} {} - {}",
            self.timestamp.format("%H:%M:%S"),
            status,
            self.stage,
            self.detail
        )?;
        if let Some(err) = &self.error {
            write!(f, " ({err})")?;
        }
        Ok(())
    }
}

/// Append-only sink for pipeline events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionLog {
    entries: Vec<LogEntry>,
}

impl ExtractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a stage event.
    pub fn record(&mut self, stage: &str, success: bool, detail: impl Into<String>) {
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            stage: stage.to_string(),
            success,
            detail: detail.into(),
            error: None,
        });
    }

    /// Record a stage failure with its error message.
    pub fn record_error(&mut self, stage: &str, detail: impl Into<String>, error: impl Into<String>) {
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            stage: stage.to_string(),
            success: false,
            detail: detail.into(),
            error: Some(error.into()),
        });
    }

    /// Record one extracted field with its provenance and confidence.
    pub fn record_field(&mut self, field: &str, value: Option<&str>, method: Method, confidence: f32) {
        let detail = match value {
            Some(v) => {
                let preview: String = v.chars().take(50).collect();
                format!("{preview} ({method}, {:.0}%)", confidence * 100.0)
            }
            None => "not found".to_string(),
        };
        self.record(&format!("extract_{field}"), value.is_some(), detail);
    }

    /// Record the completion of one document's pipeline run.
    pub fn record_complete(&mut self, result: &ExtractionResult) {
        let detail = format!(
            "name={} email={} phone={} ai_used={}",
            result.name.is_some(),
            result.email.is_some(),
            result.phone.is_some(),
            result.ai_used
        );
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            stage: "complete".to_string(),
            success: result.has_any_field(),
            detail,
            error: result.error.clone(),
        });
    }

    /// Entries for runs that produced no data at all.
    pub fn failed_runs(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.stage == "complete" && !e.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_field_previews_value() {
        let mut log = ExtractionLog::new();
        log.record_field("email", Some("jane@company.org"), Method::Regex, 0.95);
        let entry = &log.entries()[0];
        assert_eq!(entry.stage, "extract_email");
        assert!(entry.success);
        assert!(entry.detail.contains("jane@company.org"));
        assert!(entry.detail.contains("95%"));
    }

    #[test]
    fn test_record_field_not_found() {
        let mut log = ExtractionLog::new();
        log.record_field("phone", None, Method::None, 0.0);
        assert!(!log.entries()[0].success);
    }

    #[test]
    fn test_failed_runs_filter() {
        let mut log = ExtractionLog::new();
        let empty = ExtractionResult::default();
        let mut found = ExtractionResult::default();
        found.email = Some("a@b.co".to_string());

        log.record_complete(&found);
        log.record_complete(&empty);

        assert_eq!(log.failed_runs().count(), 1);
    }
}
