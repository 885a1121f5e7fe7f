//! HTTP client for an OpenRouter-compatible chat-completion endpoint.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AiError;
use crate::Result;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";
const DEFAULT_MAX_TOKENS: u32 = 200;
const DEFAULT_TEXT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_VISION_TIMEOUT: Duration = Duration::from_secs(60);

/// An image sent along with a vision request.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    /// Raw encoded image bytes (PNG or JPEG).
    pub data: Vec<u8>,
    /// MIME type, e.g. `image/png`.
    pub mime: String,
}

impl ImageAttachment {
    pub fn new(data: Vec<u8>, mime: impl Into<String>) -> Self {
        Self { data, mime: mime.into() }
    }

    fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

/// Client for the remote completion service.
///
/// Requests use deterministic sampling (temperature 0), a bounded completion
/// length and a fixed per-request timeout. No retries are attempted; a failed
/// call is reported once and the pipeline proceeds without it.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    text_timeout: Duration,
    vision_timeout: Duration,
}

impl CompletionClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            text_timeout: DEFAULT_TEXT_TIMEOUT,
            vision_timeout: DEFAULT_VISION_TIMEOUT,
        }
    }

    /// Create from the `OPENROUTER_API_KEY` environment variable.
    ///
    /// A missing credential is a valid state for the pipeline (the AI stages
    /// are skipped), so callers typically `.ok()` this.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| AiError::MissingCredential)?;
        if api_key.trim().is_empty() {
            return Err(AiError::MissingCredential);
        }
        Ok(Self::new(api_key))
    }

    /// Set the completion model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the maximum completion length in tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the text and vision request timeouts.
    pub fn with_timeouts(mut self, text: Duration, vision: Duration) -> Self {
        self.text_timeout = text;
        self.vision_timeout = vision;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a plain-text prompt and return the completion string.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: Content::Text(prompt.to_string()),
            }],
            max_tokens: self.max_tokens,
            temperature: 0.0,
        };
        self.send(&request, self.text_timeout).await
    }

    /// Send a prompt plus one or more images to the vision endpoint.
    pub async fn complete_vision(
        &self,
        prompt: &str,
        images: &[ImageAttachment],
    ) -> Result<String> {
        let mut parts = vec![Part::Text { text: prompt.to_string() }];
        parts.extend(images.iter().map(|img| Part::ImageUrl {
            image_url: ImageUrl { url: img.data_url() },
        }));

        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: Content::Parts(parts),
            }],
            max_tokens: self.max_tokens,
            temperature: 0.0,
        };
        self.send(&request, self.vision_timeout).await
    }

    /// Preflight check against the key endpoint.
    ///
    /// Only two outcomes are treated as definitive: an exhausted credit limit
    /// and a rejected credential. Anything else (including transport errors)
    /// passes, so a flaky status endpoint never blocks extraction.
    pub async fn check_credits(&self) -> Result<()> {
        let response = match self
            .client
            .get(format!("{}/auth/key", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(Duration::from_secs(10))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                debug!("credit check skipped: {}", e);
                return Ok(());
            }
        };

        match response.status().as_u16() {
            200 => {
                let status: KeyStatusResponse = match response.json().await {
                    Ok(s) => s,
                    Err(_) => return Ok(()),
                };
                if let Some(limit) = status.data.limit {
                    if status.data.usage >= limit {
                        return Err(AiError::InsufficientCredits);
                    }
                }
                Ok(())
            }
            401 => Err(AiError::InvalidCredential),
            _ => Ok(()),
        }
    }

    async fn send(&self, request: &ChatRequest<'_>, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "cvex")
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status().as_u16() {
            200 => {}
            402 => return Err(AiError::InsufficientCredits),
            429 => return Err(AiError::RateLimited),
            status => {
                warn!("completion request failed with status {}", status);
                return Err(AiError::Api(status));
            }
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::Parse("no completion choices".to_string()))
    }
}

fn map_transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::Network(e.to_string())
    }
}

// Request/response wire types.

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: Content,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Content {
    Text(String),
    Parts(Vec<Part>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Part {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct KeyStatusResponse {
    data: KeyStatusData,
}

#[derive(Deserialize)]
struct KeyStatusData {
    limit: Option<f64>,
    #[serde(default)]
    usage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder() {
        let client = CompletionClient::new("sk-test")
            .with_model("anthropic/claude-sonnet-4")
            .with_base_url("https://proxy.example.net/v1")
            .with_max_tokens(64);

        assert_eq!(client.model(), "anthropic/claude-sonnet-4");
        assert_eq!(client.base_url, "https://proxy.example.net/v1");
        assert_eq!(client.max_tokens, 64);
    }

    #[test]
    fn test_image_data_url() {
        let img = ImageAttachment::new(vec![0x89, 0x50, 0x4e, 0x47], "image/png");
        let url = img.data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_vision_parts_serialize() {
        let part = Part::ImageUrl {
            image_url: ImageUrl { url: "data:image/png;base64,AA==".to_string() },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "image_url");
        assert_eq!(json["image_url"]["url"], "data:image/png;base64,AA==");
    }
}
