//! Reflection generation for journal entries.
//!
//! Provides a `ReflectionGenerator` trait with two implementations:
//! - **OpenAI** - one chat-completions call per entry, no retries
//! - **Fallback** - wraps another generator and degrades any failure to an
//!   empty reflection so the entry is still stored

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::ReflectionSettings;

// ============================================================================
// ReflectionGenerator trait
// ============================================================================

/// Abstraction over reflection providers.
#[async_trait]
pub trait ReflectionGenerator: Send + Sync {
    /// Produce a Markdown reflection for `text`. An empty string means the
    /// provider answered but no usable text could be extracted.
    async fn generate(&self, text: &str) -> Result<String, ReflectionError>;

    /// Generator name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum ReflectionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Missing API key")]
    MissingApiKey,
}

// ============================================================================
// Prompt
// ============================================================================

const PROMPT_HEAD: &str = r#"You are **Clarity Mentor**, blending positive-psychology, discourse analysis, and Jungian insight.
I'll send a journal entry wrapped in <ENTRY> tags.

**Goal** - In ≤ 200 words, hold up a clear mirror so I can see how my mind works. No advice-giving or "fixes," just revealing patterns.

**Deliver exactly five labelled blocks (keep labels bold):**

1. **Mood Pulse** - 2-3 adjectives that distil the emotional flavour.
2. **Core Storylines** - Up to 3 brief quotes (≤ 10 words each) followed by a one-line reading of what each wording hints about my assumptions or focus.
3. **Thinking Loops** - One sentence naming the dominant cognitive pattern you detect (e.g., future-forecasting, self-comparison).
4. **Archetype in Play** - Name the Jungian archetype most evident and give a one-sentence link to the entry.
5. **Hidden Currents** - Two crisp observations of strengths, resources, or tensions running beneath the surface.

End with one open question (≤ 15 words) that could spark deeper self-reflection.
Write in plain Markdown; labels bold, content normal text.
Stay friendly, concise, insight-rich, no more than 200 words total.

<ENTRY>
"#;

const PROMPT_TAIL: &str = "\n</ENTRY>";

/// Embed `text` verbatim in the reflection prompt.
pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_HEAD.len() + text.len() + PROMPT_TAIL.len());
    prompt.push_str(PROMPT_HEAD);
    prompt.push_str(text);
    prompt.push_str(PROMPT_TAIL);
    prompt
}

// ============================================================================
// Config
// ============================================================================

/// OpenAI client configuration
#[derive(Debug, Clone)]
pub struct ReflectionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl ReflectionConfig {
    pub fn new(api_key: Option<String>, settings: &ReflectionSettings) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();

        Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout_seconds: settings.timeout_seconds,
        }
    }
}

/// Build the generator described by `settings`, wrapped in
/// `FallbackReflectionGenerator` when `degrade_on_failure` is set.
pub fn create_generator(
    settings: &ReflectionSettings,
) -> Result<Box<dyn ReflectionGenerator>, ReflectionError> {
    let client = OpenAiReflectionClient::new(ReflectionConfig::new(None, settings))?;
    if client.config.api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; reflections will fail");
    }

    if settings.degrade_on_failure {
        Ok(Box::new(FallbackReflectionGenerator::new(Box::new(client))))
    } else {
        Ok(Box::new(client))
    }
}

// ============================================================================
// Chat-completions API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: Option<OpenAiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// OpenAiReflectionClient
// ============================================================================

#[derive(Debug, Clone)]
pub struct OpenAiReflectionClient {
    client: Client,
    config: ReflectionConfig,
}

impl OpenAiReflectionClient {
    pub fn new(config: ReflectionConfig) -> Result<Self, ReflectionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    async fn complete(&self, text: &str) -> Result<String, ReflectionError> {
        if self.config.api_key.is_empty() {
            return Err(ReflectionError::MissingApiKey);
        }

        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(text),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenAiErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or(body);

            tracing::error!(code = status.as_u16(), message = %message, "OpenAI API error");

            return Err(ReflectionError::Api {
                code: status.as_u16(),
                message,
            });
        }

        Ok(extract_reflection(&body))
    }
}

/// Pull `choices[0].message.content` out of a response body, trimmed.
/// Any shape mismatch yields an empty string.
fn extract_reflection(body: &str) -> String {
    let parsed = match serde_json::from_str::<ChatResponse>(body) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable chat-completions response");
            return String::new();
        }
    };

    match parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
    {
        Some(content) => content.trim().to_string(),
        None => {
            tracing::warn!("Chat-completions response carried no message content");
            String::new()
        }
    }
}

#[async_trait]
impl ReflectionGenerator for OpenAiReflectionClient {
    async fn generate(&self, text: &str) -> Result<String, ReflectionError> {
        self.complete(text).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// FallbackReflectionGenerator
// ============================================================================

/// Wraps another generator. On any error, logs a warning and returns an
/// empty reflection so the entry is stored without one.
pub struct FallbackReflectionGenerator {
    inner: Box<dyn ReflectionGenerator>,
}

impl FallbackReflectionGenerator {
    pub fn new(inner: Box<dyn ReflectionGenerator>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ReflectionGenerator for FallbackReflectionGenerator {
    async fn generate(&self, text: &str) -> Result<String, ReflectionError> {
        match self.inner.generate(text).await {
            Ok(reflection) => Ok(reflection),
            Err(e) => {
                tracing::warn!(
                    generator = self.inner.name(),
                    error = %e,
                    "Reflection failed - storing entry without one"
                );
                Ok(String::new())
            }
        }
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

// ============================================================================
// TESTS
// ============================================================================
