/// LLM Client: the single point of entry for all Ollama calls in the tailoring service.
///
/// ARCHITECTURAL RULE: No other module may talk to the Ollama HTTP API directly.
/// Pipeline stages depend on the `TextGenerator` and `Embedder` traits, never on
/// `OllamaClient` itself.
///
/// Calls are not retried. A failed call is returned to the stage, which owns the fallback.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Collaborator traits
// ────────────────────────────────────────────────────────────────────────────

/// Free-form text generation. Output is non-deterministic above temperature 0.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;
}

/// Text embedding. Deterministic per model and input.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ResponseMessage,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Ollama chat, embeddings and tags endpoints.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    host: String,
    model: String,
    embedding_model: String,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.llm_timeout_secs))
                .build()?,
            host: config.ollama_host.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            embedding_model: config.embedding_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Lists the model names the Ollama daemon has pulled.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.host))
            .send()
            .await?;
        let response = check_status(response).await?;
        let tags: TagsResponse = response.json().await?;
        Ok(tags
            .models
            .into_iter()
            .filter_map(|m| m.name.or(m.model))
            .collect())
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: ChatOptions { temperature },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&request_body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let chat: ChatResponse = response.json().await?;

        debug!(
            "LLM call succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
            self.model, chat.prompt_eval_count, chat.eval_count
        );

        Ok(chat.message.content)
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request_body = EmbeddingRequest {
            model: &self.embedding_model,
            prompt: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.host))
            .json(&request_body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: EmbeddingResponse = response.json().await?;

        if body.embedding.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(body.embedding)
    }
}

/// Turns a non-2xx response into `LlmError::Api`, preferring Ollama's `{"error": ..}` message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<OllamaError>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(LlmError::Api {
        status: status.as_u16(),
        message,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Best-effort JSON extraction
// ────────────────────────────────────────────────────────────────────────────

/// Returns the substring from the first `{` to the last `}` (inclusive).
///
/// Models often wrap JSON in prose. This tolerates the wrapper but nothing else:
/// braces inside the prose are swallowed into the slice and break decoding.
pub fn extract_json_object(text: &str) -> Option<&str> {
    slice_between(text, '{', '}')
}

/// Returns the substring from the first `[` to the last `]` (inclusive).
pub fn extract_json_array(text: &str) -> Option<&str> {
    slice_between(text, '[', ']')
}

fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
