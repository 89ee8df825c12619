//! Deterministic stand-ins for the model services, shared by unit tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{Embedder, LlmError, TextGenerator};

/// Replies to prompts by substring rules; the first matching rule wins.
/// A prompt with no matching rule fails like an unreachable model server.
#[derive(Default)]
pub struct ScriptedGenerator {
    rules: Vec<(Vec<String>, Option<String>)>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies with `reply` when the prompt contains every needle.
    pub fn respond_when(mut self, needles: &[&str], reply: &str) -> Self {
        self.rules.push((
            needles.iter().map(|n| n.to_string()).collect(),
            Some(reply.to_string()),
        ));
        self
    }

    /// Fails when the prompt contains every needle.
    pub fn fail_when(mut self, needles: &[&str]) -> Self {
        self.rules
            .push((needles.iter().map(|n| n.to_string()).collect(), None));
        self
    }

    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), temperature));

        let rule = self
            .rules
            .iter()
            .find(|(needles, _)| needles.iter().all(|n| prompt.contains(n.as_str())));

        match rule {
            Some((_, Some(reply))) => Ok(reply.clone()),
            _ => Err(LlmError::Api {
                status: 503,
                message: "model server unavailable".to_string(),
            }),
        }
    }
}

/// Bag-of-words embedder over a tiny fixed vocabulary, plus a constant bias axis.
/// Texts containing `EMBED_FAIL_MARKER` fail to embed.
#[derive(Default)]
pub struct KeywordEmbedder {
    calls: Mutex<usize>,
}

pub const EMBED_FAIL_MARKER: &str = "[embed-fail]";

const VOCABULARY: &[&str] = &[
    "python", "aws", "backend", "team", "lead", "engineer", "rust", "kubernetes", "design", "data",
];

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        *self.calls.lock().unwrap() += 1;

        if text.contains(EMBED_FAIL_MARKER) {
            return Err(LlmError::EmptyContent);
        }

        let lowered = text.to_lowercase();
        let mut vector: Vec<f32> = VOCABULARY
            .iter()
            .map(|word| lowered.matches(word).count() as f32)
            .collect();
        vector.push(0.1);
        Ok(vector)
    }
}

/// `KeywordEmbedder` that sleeps before every embedding.
pub struct SlowEmbedder {
    inner: KeywordEmbedder,
    delay: Duration,
}

impl SlowEmbedder {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: KeywordEmbedder::new(),
            delay,
        }
    }
}

#[async_trait]
impl Embedder for SlowEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        tokio::time::sleep(self.delay).await;
        self.inner.embed(text).await
    }
}

/// Embedder whose every call fails.
pub struct UnavailableEmbedder;

#[async_trait]
impl Embedder for UnavailableEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "embedding model not loaded".to_string(),
        })
    }
}
