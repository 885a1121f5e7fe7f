//! Data models: per-document results and pipeline configuration.

pub mod config;
pub mod result;

pub use config::{AiConfig, CvexConfig, DocumentConfig, ExtractionConfig, FieldPriority};
pub use result::{ExtractionResult, FieldConfidence, FieldMethods, Method};
