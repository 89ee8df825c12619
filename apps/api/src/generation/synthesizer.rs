//! Content Synthesizer: rewrites retrieved resume chunks for a specific job.

use std::sync::Arc;

use tracing::info;

use crate::errors::{StageError, StageOutput};
use crate::generation::prompts::{
    CONTENT_GENERATION_ERROR, SYNTHESIS_PROMPT_TEMPLATE, SYNTHESIS_TEMPERATURE,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::TextGenerator;

/// Renders chunks one per line as `- {chunk}` and fills the synthesis template.
pub fn build_synthesis_prompt(job_description: &str, relevant_chunks: &[String]) -> String {
    let bullets = relevant_chunks
        .iter()
        .map(|chunk| format!("- {chunk}"))
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        SYNTHESIS_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("relevant_experience", bullets.as_str()),
        ],
    )
}

pub struct ContentSynthesizer {
    llm: Arc<dyn TextGenerator>,
}

impl ContentSynthesizer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Returns the model's text as-is, or `CONTENT_GENERATION_ERROR` if the call fails.
    pub async fn synthesize(
        &self,
        job_description: &str,
        relevant_chunks: &[String],
    ) -> StageOutput<String> {
        let prompt = build_synthesis_prompt(job_description, relevant_chunks);
        info!(
            "Synthesizing tailored content from {} chunks",
            relevant_chunks.len()
        );

        let result = self
            .llm
            .generate(&prompt, SYNTHESIS_TEMPERATURE)
            .await
            .map_err(StageError::from);
        StageOutput::recover(result, "Content synthesis", || {
            CONTENT_GENERATION_ERROR.to_string()
        })
    }
}
