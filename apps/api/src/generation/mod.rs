// Tailoring pipeline: job analysis, content synthesis and the orchestrator that
// sequences them with retrieval and ATS scoring.
// All model calls go through the llm_client traits.

pub mod handlers;
pub mod job_analyzer;
pub mod orchestrator;
pub mod prompts;
pub mod synthesizer;
