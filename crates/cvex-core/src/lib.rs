//! Core library for résumé contact extraction.
//!
//! This crate provides:
//! - Regex field extractors for name, email and phone with confidence scores
//! - Context disambiguation (the subject's phone vs a referee's)
//! - An AI fallback/validator over a remote completion service
//! - Document-to-text collaborator adapters (PDF, plain text)
//! - The per-document result and configuration models

pub mod document;
pub mod error;
pub mod models;
pub mod resume;

pub use document::{DocumentText, PdfTextSource, PlainTextSource, TextSource};
pub use error::{CvexError, DocumentError, Result};
pub use models::config::{AiConfig, CvexConfig, DocumentConfig, ExtractionConfig, FieldPriority};
pub use models::result::{ExtractionResult, FieldConfidence, FieldMethods, Method};
pub use resume::{EmailExtractor, ExtractionLog, NameExtractor, PhoneExtractor, ResumeParser};

/// Re-export completion-layer types.
pub use cvex_ai::{AiError, CompletionClient, ImageAttachment};
