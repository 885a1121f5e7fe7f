//! Error types for the cvex-core library.

use thiserror::Error;

/// Main error type for the cvex library.
#[derive(Error, Debug)]
pub enum CvexError {
    /// Document loading/text extraction error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Completion service error.
    #[error("AI error: {0}")]
    Ai(#[from] cvex_ai::AiError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by document-to-text sources.
///
/// Each of these is fatal for the affected document only; batch processing
/// records it and moves on.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file format is not handled by any configured source.
    #[error("unsupported document format: {0}")]
    Unsupported(String),

    /// The file could not be parsed (corrupt or truncated).
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The document yielded no machine-readable text.
    #[error("no text could be extracted")]
    Empty,
}

/// Result type for the cvex library.
pub type Result<T> = std::result::Result<T, CvexError>;
