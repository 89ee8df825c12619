//! Job Analyzer: distills a job description into a few skills and responsibilities.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{StageError, StageOutput};
use crate::generation::prompts::{ANALYSIS_TEMPERATURE, JOB_ANALYSIS_PROMPT_TEMPLATE};
use crate::llm_client::prompts::{fill_template, JSON_OBJECT_INSTRUCTION};
use crate::llm_client::{extract_json_object, TextGenerator};

pub const MAX_SKILLS: usize = 5;
pub const MAX_RESPONSIBILITIES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

impl JobAnalysis {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.responsibilities.is_empty()
    }

    /// Skills then responsibilities, in order.
    pub fn search_terms(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .chain(self.responsibilities.iter())
            .map(String::as_str)
    }

    /// Drops anything past `MAX_SKILLS` skills and `MAX_RESPONSIBILITIES` responsibilities.
    pub fn bounded(mut self) -> Self {
        self.skills.truncate(MAX_SKILLS);
        self.responsibilities.truncate(MAX_RESPONSIBILITIES);
        self
    }
}

/// Decodes the first-`{`-to-last-`}` slice of a model reply.
pub fn parse_analysis(raw: &str) -> Result<JobAnalysis, StageError> {
    let json = extract_json_object(raw).ok_or_else(|| {
        StageError::MalformedModelOutput("no JSON object found in job analysis".to_string())
    })?;
    let analysis: JobAnalysis = serde_json::from_str(json)?;
    Ok(analysis.bounded())
}

pub struct JobAnalyzer {
    llm: Arc<dyn TextGenerator>,
}

impl JobAnalyzer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Any failure yields an empty analysis.
    pub async fn analyze(&self, job_description: &str) -> StageOutput<JobAnalysis> {
        let output = StageOutput::recover(
            self.try_analyze(job_description).await,
            "Job analysis",
            JobAnalysis::default,
        );
        if output.value.is_empty() {
            warn!("Job analysis produced no skills or responsibilities");
        } else {
            info!(
                "Job analysis: {} skills, {} responsibilities",
                output.value.skills.len(),
                output.value.responsibilities.len()
            );
        }
        output
    }

    async fn try_analyze(&self, job_description: &str) -> Result<JobAnalysis, StageError> {
        let prompt = fill_template(
            JOB_ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("json_instruction", JSON_OBJECT_INSTRUCTION),
                ("job_description", job_description),
            ],
        );
        let raw = self.llm.generate(&prompt, ANALYSIS_TEMPERATURE).await?;
        parse_analysis(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    #[test]
    fn test_parse_ignores_conversational_prefix() {
        let raw = r#"Sure! {"skills": ["Go"], "responsibilities": ["Ship features"]}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.skills, vec!["Go"]);
        assert_eq!(analysis.responsibilities, vec!["Ship features"]);
    }

    #[test]
    fn test_parse_missing_key_defaults_to_empty() {
        let analysis = parse_analysis(r#"{"skills": ["Rust"]}"#).unwrap();
        assert_eq!(analysis.skills, vec!["Rust"]);
        assert!(analysis.responsibilities.is_empty());
    }

    #[test]
    fn test_parse_truncates_to_bounds() {
        let raw = r#"{"skills": ["a","b","c","d","e","f","g"], "responsibilities": ["x","y","z","w"]}"#;
        let analysis = parse_analysis(raw).unwrap();
        assert_eq!(analysis.skills.len(), MAX_SKILLS);
        assert_eq!(analysis.responsibilities, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_parse_braces_in_prose_break_decoding() {
        let raw = r#"Use {curly} braces: {"skills": ["Go"], "responsibilities": []} ok"#;
        assert!(matches!(
            parse_analysis(raw),
            Err(StageError::MalformedModelOutput(_))
        ));
    }

    #[test]
    fn test_parse_without_braces_is_malformed() {
        assert!(matches!(
            parse_analysis("skills: Go"),
            Err(StageError::MalformedModelOutput(_))
        ));
    }

    #[test]
    fn test_search_terms_order() {
        let analysis = JobAnalysis {
            skills: vec!["Python".into(), "AWS".into()],
            responsibilities: vec!["Build APIs".into()],
        };
        let terms: Vec<&str> = analysis.search_terms().collect();
        assert_eq!(terms, vec!["Python", "AWS", "Build APIs"]);
    }

    #[tokio::test]
    async fn test_analyze_sends_job_at_low_temperature() {
        let llm = Arc::new(ScriptedGenerator::new().respond_when(
            &["5 most critical skills", "Kotlin"],
            r#"{"skills": ["Kotlin"], "responsibilities": ["Ship Android features"]}"#,
        ));
        let analyzer = JobAnalyzer::new(llm.clone());

        let output = analyzer.analyze("Android engineer, Kotlin required").await;

        assert!(!output.is_degraded());
        assert_eq!(output.value.skills, vec!["Kotlin"]);
        assert_eq!(llm.calls()[0].1, ANALYSIS_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_analyze_model_failure_is_empty() {
        let analyzer = JobAnalyzer::new(Arc::new(ScriptedGenerator::new()));

        let output = analyzer.analyze("Any job").await;

        assert!(output.value.is_empty());
        assert!(matches!(
            output.fallbacks[0],
            StageError::ServiceUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_analyze_garbage_reply_is_empty() {
        let llm = Arc::new(
            ScriptedGenerator::new().respond_when(&["5 most critical skills"], "{not json}"),
        );
        let output = JobAnalyzer::new(llm).analyze("Any job").await;

        assert!(output.value.is_empty());
        assert!(matches!(
            output.fallbacks[0],
            StageError::MalformedModelOutput(_)
        ));
    }
}
