//! Hybrid résumé parser combining regex extraction with an AI fallback.
//!
//! The regex stages always run first and their values are never discarded:
//! an AI miss, an unparsable completion or any transport failure leaves the
//! regex-derived fields exactly as they were. Which fields the model is
//! consulted for depends on [`FieldPriority`].

use std::time::Duration;

use tracing::{debug, info, warn};

use cvex_ai::{AiError, CompletionClient, ImageAttachment, prompts, response};

use crate::models::config::{CvexConfig, ExtractionConfig, FieldPriority};
use crate::models::result::{ExtractionResult, Method};

use super::log::ExtractionLog;
use super::rules::patterns::{EMAIL, PHONE_SPAN, phone_digits};
use super::rules::{EmailExtractor, NameExtractor, PhoneExtractor};

/// Confidence for an AI name with 2-4 tokens.
const CONF_AI_NAME_FULL: f32 = 0.92;
/// Confidence for a single-token AI name.
const CONF_AI_NAME_SINGLE: f32 = 0.65;
/// Confidence for a 5-token AI name.
const CONF_AI_NAME_LONG: f32 = 0.55;
/// Confidence when regex and AI agree on the phone number.
const CONF_PHONE_AGREED: f32 = 0.95;
/// Confidence when the AI value supersedes (or supplies) the phone number.
const CONF_PHONE_AI: f32 = 0.88;
/// Confidence for an email supplied by the combined or vision call.
const CONF_AI_EMAIL: f32 = 0.85;

/// Longest string still accepted as an AI-returned name.
const AI_NAME_MAX_CHARS: usize = 100;
/// Tokens that mark an AI "name" as document boilerplate.
const AI_NAME_BOILERPLATE: &[&str] = &["resume", "cv", "curriculum"];

/// Advisory attached when no credential is configured.
pub const NOTE_NO_CREDENTIAL: &str = "no API key configured - regex-only extraction";
/// Advisory attached when the document carries no usable text.
pub const NOTE_NO_TEXT: &str = "no extractable content";
/// Advisory attached when vision extraction is disabled by configuration.
pub const NOTE_VISION_DISABLED: &str = "vision extraction disabled";

/// Hybrid résumé parser.
pub struct ResumeParser {
    config: CvexConfig,
    client: Option<CompletionClient>,
}

impl ResumeParser {
    /// Create a regex-only parser with the given configuration.
    pub fn new(config: CvexConfig) -> Self {
        Self { config, client: None }
    }

    /// Create a parser, attaching a completion client when `OPENROUTER_API_KEY`
    /// is set and AI is enabled. A missing credential is a valid state: the AI
    /// stages are skipped with an advisory note.
    pub fn from_env(config: CvexConfig) -> Self {
        let client = if config.ai.enabled {
            CompletionClient::from_env().ok().map(|c| {
                c.with_model(config.ai.model.clone())
                    .with_base_url(config.ai.base_url.clone())
                    .with_max_tokens(config.ai.max_tokens)
                    .with_timeouts(
                        Duration::from_secs(config.ai.text_timeout_secs),
                        Duration::from_secs(config.ai.vision_timeout_secs),
                    )
            })
        } else {
            None
        };

        if client.is_none() && config.ai.enabled {
            debug!("no API credential found; AI stages disabled");
        }

        Self { config, client }
    }

    /// Attach an explicit completion client.
    pub fn with_client(mut self, client: CompletionClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Whether an AI client is available and enabled.
    pub fn ai_available(&self) -> bool {
        self.ai_client().is_some()
    }

    /// Preflight credit check against the configured client.
    ///
    /// A parser without a client passes trivially; only definitive credit
    /// exhaustion or a rejected credential fails.
    pub async fn check_credits(&self) -> cvex_ai::Result<()> {
        match self.ai_client() {
            Some(client) => client.check_credits().await,
            None => Ok(()),
        }
    }

    fn ai_client(&self) -> Option<&CompletionClient> {
        if self.config.ai.enabled {
            self.client.as_ref()
        } else {
            None
        }
    }

    fn extraction(&self) -> &ExtractionConfig {
        &self.config.extraction
    }

    /// Process one document's text into an [`ExtractionResult`].
    ///
    /// Never fails: every error state is encoded in the result record.
    pub async fn process(&self, text: &str) -> ExtractionResult {
        let mut log = ExtractionLog::new();
        self.process_with_log(text, &mut log).await
    }

    /// [`process`](Self::process) variant recording each stage into a
    /// caller-owned log sink.
    pub async fn process_with_log(
        &self,
        text: &str,
        log: &mut ExtractionLog,
    ) -> ExtractionResult {
        if text.trim().is_empty() {
            let result = ExtractionResult {
                error: Some(NOTE_NO_TEXT.to_string()),
                ..Default::default()
            };
            log.record_error("text", "empty document text", NOTE_NO_TEXT);
            log.record_complete(&result);
            return result;
        }

        let mut result = ExtractionResult::default();

        // Regex stages: independent, pure, always run.
        if let Some(m) = EmailExtractor::from_config(self.extraction()).extract(text) {
            result.email = Some(m.value);
            result.confidence.email = m.confidence;
            result.methods.email = Method::Regex;
        }
        log.record_field(
            "email",
            result.email.as_deref(),
            result.methods.email,
            result.confidence.email,
        );

        if let Some(m) = NameExtractor::from_config(self.extraction()).extract(text) {
            result.name = Some(m.value);
            result.confidence.name = m.confidence;
            result.methods.name = Method::Regex;
        }
        log.record_field(
            "name",
            result.name.as_deref(),
            result.methods.name,
            result.confidence.name,
        );

        if let Some(m) = PhoneExtractor::from_config(self.extraction()).extract(text) {
            result.phone = Some(m.value);
            result.confidence.phone = m.confidence;
            result.methods.phone = Method::Regex;
        }
        log.record_field(
            "phone",
            result.phone.as_deref(),
            result.methods.phone,
            result.confidence.phone,
        );

        let mut ai_error: Option<AiError> = None;
        match self.ai_client() {
            None => {
                result.error = Some(NOTE_NO_CREDENTIAL.to_string());
            }
            Some(client) => {
                match self.config.ai.field_priority {
                    FieldPriority::AiAlways => {
                        self.run_ai_always(client, text, &mut result, &mut ai_error, log)
                            .await;
                    }
                    FieldPriority::RegexFirst => {
                        self.run_regex_first(client, text, &mut result, &mut ai_error, log)
                            .await;
                    }
                }
                if let Some(err) = ai_error {
                    result.error = Some(err.to_string());
                }
            }
        }

        result.sync_ai_used();
        info!(
            "extraction complete: name={} email={} phone={} ai_used={}",
            result.name.is_some(),
            result.email.is_some(),
            result.phone.is_some(),
            result.ai_used
        );
        log.record_complete(&result);
        result
    }

    /// Ai-always variant: the model is consulted for the name on every run and
    /// validates (or supersedes) the regex phone choice. Email is regex-
    /// authoritative and never sent to the model.
    async fn run_ai_always(
        &self,
        client: &CompletionClient,
        text: &str,
        result: &mut ExtractionResult,
        ai_error: &mut Option<AiError>,
        log: &mut ExtractionLog,
    ) {
        match client.complete(&prompts::name_prompt(text)).await {
            Ok(raw) => {
                let accepted = response::parse_field(&raw).and_then(|n| accept_ai_name(&n));
                match accepted {
                    Some((value, confidence)) => {
                        log.record("ai_name", true, format!("{value} ({confidence:.2})"));
                        result.name = Some(value);
                        result.confidence.name = confidence;
                        result.methods.name = Method::Ai;
                    }
                    None => {
                        log.record("ai_name", false, "model returned no usable name");
                    }
                }
            }
            Err(err) => {
                warn!("AI name extraction failed: {}", err);
                log.record_error("ai_name", "completion failed", err.to_string());
                note_ai_error(ai_error, err);
            }
        }

        match client.complete(&prompts::phone_prompt(text)).await {
            Ok(raw) => {
                let ai_phone = response::parse_field(&raw)
                    .and_then(|v| sanitize_ai_phone(&v, self.extraction()));
                match ai_phone {
                    Some(ai_phone) => {
                        let (value, confidence) =
                            reconcile_phone(result.phone.as_deref(), &ai_phone);
                        log.record("ai_phone", true, format!("{value} ({confidence:.2})"));
                        result.phone = Some(value);
                        result.confidence.phone = confidence;
                        result.methods.phone = Method::Ai;
                    }
                    None => {
                        log.record("ai_phone", false, "model returned no usable phone");
                    }
                }
            }
            Err(err) => {
                warn!("AI phone validation failed: {}", err);
                log.record_error("ai_phone", "completion failed", err.to_string());
                note_ai_error(ai_error, err);
            }
        }
    }

    /// Regex-first variant: one combined JSON call, issued only when regex
    /// left a field empty. Whether a missing email may be filled is gated by
    /// the `ai_email` flag.
    async fn run_regex_first(
        &self,
        client: &CompletionClient,
        text: &str,
        result: &mut ExtractionResult,
        ai_error: &mut Option<AiError>,
        log: &mut ExtractionLog,
    ) {
        let want_name = result.name.is_none();
        let want_phone = result.phone.is_none();
        let want_email = result.email.is_none() && self.config.ai.ai_email;

        if !(want_name || want_phone || want_email) {
            debug!("regex extracted all requested fields; skipping AI call");
            return;
        }

        let contact = match client.complete(&prompts::contact_prompt(text)).await {
            Ok(raw) => response::parse_contact(&raw),
            Err(err) => {
                warn!("combined AI extraction failed: {}", err);
                log.record_error("ai_contact", "completion failed", err.to_string());
                note_ai_error(ai_error, err);
                return;
            }
        };
        log.record(
            "ai_contact",
            !contact.is_empty(),
            format!(
                "name={} email={} phone={}",
                contact.name.is_some(),
                contact.email.is_some(),
                contact.phone.is_some()
            ),
        );

        if want_name {
            if let Some((value, confidence)) =
                contact.name.as_deref().and_then(accept_ai_name)
            {
                result.name = Some(value);
                result.confidence.name = confidence;
                result.methods.name = Method::Ai;
            }
        }

        if want_phone {
            if let Some(phone) = contact
                .phone
                .as_deref()
                .and_then(|v| sanitize_ai_phone(v, self.extraction()))
            {
                result.phone = Some(phone);
                result.confidence.phone = CONF_PHONE_AI;
                result.methods.phone = Method::Ai;
            }
        }

        if want_email {
            if let Some(email) = contact.email.as_deref().filter(|e| EMAIL.is_match(e)) {
                result.email = Some(email.to_string());
                result.confidence.email = CONF_AI_EMAIL;
                result.methods.email = Method::Ai;
            }
        }
    }

    /// Process an image-based document through the vision endpoint.
    pub async fn process_image(&self, images: &[ImageAttachment]) -> ExtractionResult {
        let mut log = ExtractionLog::new();
        self.process_image_with_log(images, &mut log).await
    }

    /// [`process_image`](Self::process_image) with a caller-owned log sink.
    pub async fn process_image_with_log(
        &self,
        images: &[ImageAttachment],
        log: &mut ExtractionLog,
    ) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        let Some(client) = self.ai_client() else {
            result.error = Some(NOTE_NO_CREDENTIAL.to_string());
            log.record_complete(&result);
            return result;
        };
        if !self.config.ai.vision {
            result.error = Some(NOTE_VISION_DISABLED.to_string());
            log.record_complete(&result);
            return result;
        }
        if images.is_empty() {
            result.error = Some(NOTE_NO_TEXT.to_string());
            log.record_complete(&result);
            return result;
        }

        match client
            .complete_vision(&prompts::vision_prompt(), images)
            .await
        {
            Ok(raw) => {
                let contact = response::parse_contact(&raw);
                log.record(
                    "vision_contact",
                    !contact.is_empty(),
                    format!(
                        "name={} email={} phone={}",
                        contact.name.is_some(),
                        contact.email.is_some(),
                        contact.phone.is_some()
                    ),
                );

                if let Some((value, confidence)) =
                    contact.name.as_deref().and_then(accept_ai_name)
                {
                    result.name = Some(value);
                    result.confidence.name = confidence;
                    result.methods.name = Method::Ai;
                }
                if let Some(phone) = contact
                    .phone
                    .as_deref()
                    .and_then(|v| sanitize_ai_phone(v, self.extraction()))
                {
                    result.phone = Some(phone);
                    result.confidence.phone = CONF_PHONE_AI;
                    result.methods.phone = Method::Ai;
                }
                if let Some(email) = contact.email.as_deref().filter(|e| EMAIL.is_match(e)) {
                    result.email = Some(email.to_string());
                    result.confidence.email = CONF_AI_EMAIL;
                    result.methods.email = Method::Ai;
                }
            }
            Err(err) => {
                warn!("vision extraction failed: {}", err);
                log.record_error("vision_contact", "completion failed", err.to_string());
                result.error = Some(err.to_string());
            }
        }

        result.sync_ai_used();
        log.record_complete(&result);
        result
    }
}

/// Filter an AI-returned name and score it by token count.
///
/// Boilerplate ("resume", "cv", …), over-long strings and token counts
/// outside 1-5 are rejected outright.
pub fn accept_ai_name(raw: &str) -> Option<(String, f32)> {
    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() || name.chars().count() > AI_NAME_MAX_CHARS {
        return None;
    }

    let lower = name.to_lowercase();
    if AI_NAME_BOILERPLATE.iter().any(|t| lower.contains(t)) {
        return None;
    }

    let confidence = match name.split_whitespace().count() {
        2..=4 => CONF_AI_NAME_FULL,
        1 => CONF_AI_NAME_SINGLE,
        5 => CONF_AI_NAME_LONG,
        _ => return None,
    };
    Some((name.to_string(), confidence))
}

/// Reconcile the regex phone choice with the model's answer.
///
/// Agreement (same digits) keeps the regex formatting at high confidence;
/// disagreement prefers the model, which sees enough context to skip referee
/// numbers the positional heuristics can miss.
pub fn reconcile_phone(regex_phone: Option<&str>, ai_phone: &str) -> (String, f32) {
    if let Some(rx) = regex_phone {
        if phone_digits(rx) == phone_digits(ai_phone) {
            return (rx.to_string(), CONF_PHONE_AGREED);
        }
    }
    (ai_phone.to_string(), CONF_PHONE_AI)
}

/// Pull a phone-shaped span out of free-form model output and enforce the
/// digit-count invariant.
fn sanitize_ai_phone(raw: &str, config: &ExtractionConfig) -> Option<String> {
    let span = PHONE_SPAN.find(raw)?.as_str().trim().to_string();
    let digits = phone_digits(&span);
    if digits.len() < config.phone_min_digits || digits.len() > config.phone_max_digits {
        return None;
    }
    Some(span)
}

/// Keep the most severe AI error for surfacing; parse failures are silently
/// treated as "not found".
fn note_ai_error(slot: &mut Option<AiError>, err: AiError) {
    if matches!(err, AiError::Parse(_)) {
        debug!("unparsable completion treated as not found: {}", err);
        return;
    }
    if slot.as_ref().is_none_or(|held| err.severity() > held.severity()) {
        *slot = Some(err);
    }
}
