//! Error types for the completion layer.

use thiserror::Error;

/// Errors that can occur when calling the completion service.
///
/// All of these are non-fatal for the extraction pipeline: the caller falls
/// back to regex-derived values and surfaces the message as an advisory.
#[derive(Error, Debug)]
pub enum AiError {
    /// No API credential is configured.
    #[error("no API key configured")]
    MissingCredential,

    /// The service rejected the credential.
    #[error("invalid API key")]
    InvalidCredential,

    /// The account has run out of credits (HTTP 402).
    #[error("insufficient AI credits")]
    InsufficientCredits,

    /// The service is rate limiting requests (HTTP 429).
    #[error("AI rate limit exceeded")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("AI API error: {0}")]
    Api(u16),

    /// The request exceeded its timeout.
    #[error("AI request timed out")]
    Timeout,

    /// Connection or transport failure.
    #[error("AI request failed: {0}")]
    Network(String),

    /// The response envelope could not be decoded.
    #[error("unparsable AI response: {0}")]
    Parse(String),
}

impl AiError {
    /// Ranking used when several stages fail and only one advisory can be
    /// surfaced. Credit exhaustion affects every later document in a batch,
    /// so it wins over rate limiting, which wins over transient transport
    /// failures. Parse failures rank zero and are treated as "not found".
    pub fn severity(&self) -> u8 {
        match self {
            AiError::InsufficientCredits => 4,
            AiError::RateLimited => 3,
            AiError::MissingCredential | AiError::InvalidCredential => 2,
            AiError::Timeout | AiError::Network(_) | AiError::Api(_) => 1,
            AiError::Parse(_) => 0,
        }
    }
}
