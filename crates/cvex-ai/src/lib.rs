//! Remote completion layer for cvex.
//!
//! This crate talks to an OpenRouter-compatible chat-completion endpoint and
//! packages the pieces the extraction pipeline needs:
//! - a small HTTP client with deterministic sampling and bounded timeouts
//! - prompt builders for single-field, combined-JSON and vision requests
//! - tolerant response parsing (code fences, `NOT_FOUND` sentinel)

mod client;
mod error;
pub mod prompts;
pub mod response;

pub use client::{CompletionClient, ImageAttachment};
pub use error::AiError;
pub use response::AiContact;

/// Result type for completion operations.
pub type Result<T> = std::result::Result<T, AiError>;
