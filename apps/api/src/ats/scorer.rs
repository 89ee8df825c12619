//! ATS Scorer: composite match score for a tailored resume against a job.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ats::extraction::{FallbackExtractor, TermKind};
use crate::ats::prompts::{
    ANALYSIS_TEMPERATURE, ANALYSIS_UNAVAILABLE, DETAILED_ANALYSIS_PROMPT_TEMPLATE,
    EXPERIENCE_RELEVANCE_PROMPT_TEMPLATE, EXPERIENCE_TEMPERATURE,
};
use crate::ats::scoring::{
    clamp_score, format_score, keyword_score, missing_terms, overall_score, recommendations,
    skill_score, TermSet,
};
use crate::errors::{StageError, StageOutput};
use crate::llm_client::prompts::{excerpt, fill_template, JSON_OBJECT_INSTRUCTION};
use crate::llm_client::{extract_json_object, TextGenerator};

/// Experience score used when the model cannot rate the match.
pub const NEUTRAL_EXPERIENCE_SCORE: f64 = 50.0;

/// Characters of each document shown to the experience rater.
const EXPERIENCE_EXCERPT_CHARS: usize = 500;

/// Terms of each side named in the narrative analysis prompt.
const ANALYSIS_TERM_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub overall_score: f64,
    pub keyword_score: f64,
    pub skill_score: f64,
    pub experience_score: f64,
    pub format_score: f64,
    pub missing_keywords: TermSet,
    pub missing_skills: TermSet,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExperienceRating {
    #[serde(default = "neutral_score")]
    score: f64,
    #[serde(default)]
    explanation: String,
}

fn neutral_score() -> f64 {
    NEUTRAL_EXPERIENCE_SCORE
}

/// Decodes `{"score": .., "explanation": ..}` out of a model reply. A missing
/// `score` counts as neutral; out-of-range values are clamped.
pub fn parse_experience_rating(raw: &str) -> Result<f64, StageError> {
    let json = extract_json_object(raw).ok_or_else(|| {
        StageError::MalformedModelOutput("no JSON object found in rating reply".to_string())
    })?;
    let rating: ExperienceRating = serde_json::from_str(json)?;
    debug!("Experience rated {}: {}", rating.score, rating.explanation);
    Ok(clamp_score(rating.score))
}

fn first_terms(terms: &TermSet) -> String {
    terms
        .iter()
        .take(ANALYSIS_TERM_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct AtsScorer {
    llm: Arc<dyn TextGenerator>,
    keywords: FallbackExtractor,
    skills: FallbackExtractor,
}

impl AtsScorer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            keywords: FallbackExtractor::new(llm.clone(), TermKind::Keywords),
            skills: FallbackExtractor::new(llm.clone(), TermKind::Skills),
            llm,
        }
    }

    /// Scores `resume` against `job_description`. Never fails: each model-backed
    /// part falls back to its default and the failures ride along in `fallbacks`.
    pub async fn score(&self, job_description: &str, resume: &str) -> StageOutput<AtsReport> {
        let mut fallbacks = Vec::new();

        let job_keywords = self
            .keywords
            .extract(job_description)
            .await
            .collect_into(&mut fallbacks);
        let resume_keywords = self
            .keywords
            .extract(resume)
            .await
            .collect_into(&mut fallbacks);
        let job_skills = self
            .skills
            .extract(job_description)
            .await
            .collect_into(&mut fallbacks);
        let resume_skills = self
            .skills
            .extract(resume)
            .await
            .collect_into(&mut fallbacks);

        let keyword = keyword_score(&job_keywords, &resume_keywords);
        let skill = skill_score(&job_skills, &resume_skills);
        let experience = self
            .experience_relevance(job_description, resume)
            .await
            .collect_into(&mut fallbacks);
        let format = format_score(resume);
        let overall = overall_score(keyword, skill, experience, format);

        let missing_keywords = missing_terms(&job_keywords, &resume_keywords);
        let missing_skills = missing_terms(&job_skills, &resume_skills);
        let recommendations = recommendations(&missing_keywords, overall);

        let analysis = self
            .detailed_analysis(&job_keywords, &resume_keywords)
            .await
            .collect_into(&mut fallbacks);

        info!(
            "ATS score {overall} (keywords {keyword:.1}, skills {skill:.1}, experience {experience:.1}, format {format:.1})"
        );

        StageOutput {
            value: AtsReport {
                overall_score: overall,
                keyword_score: keyword,
                skill_score: skill,
                experience_score: experience,
                format_score: format,
                missing_keywords,
                missing_skills,
                analysis,
                recommendations,
            },
            fallbacks,
        }
    }

    async fn experience_relevance(&self, job_description: &str, resume: &str) -> StageOutput<f64> {
        let prompt = fill_template(
            EXPERIENCE_RELEVANCE_PROMPT_TEMPLATE,
            &[
                ("json_instruction", JSON_OBJECT_INSTRUCTION),
                ("job_excerpt", excerpt(job_description, EXPERIENCE_EXCERPT_CHARS)),
                ("resume_excerpt", excerpt(resume, EXPERIENCE_EXCERPT_CHARS)),
            ],
        );

        let result = match self.llm.generate(&prompt, EXPERIENCE_TEMPERATURE).await {
            Ok(raw) => parse_experience_rating(&raw),
            Err(e) => Err(e.into()),
        };
        StageOutput::recover(result, "Experience relevance", || {
            NEUTRAL_EXPERIENCE_SCORE
        })
    }

    async fn detailed_analysis(
        &self,
        job_keywords: &TermSet,
        resume_keywords: &TermSet,
    ) -> StageOutput<String> {
        let job_terms = first_terms(job_keywords);
        let resume_terms = first_terms(resume_keywords);
        let prompt = fill_template(
            DETAILED_ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("job_keywords", job_terms.as_str()),
                ("resume_keywords", resume_terms.as_str()),
            ],
        );

        let result = self
            .llm
            .generate(&prompt, ANALYSIS_TEMPERATURE)
            .await
            .map_err(StageError::from);
        StageOutput::recover(result, "Detailed analysis", || {
            ANALYSIS_UNAVAILABLE.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    fn terms(items: &[&str]) -> TermSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    const JOB: &str = "We need python, aws and leadership.";
    const RESUME: &str = "Cooking and gardening enthusiast.";

    #[test]
    fn test_parse_rating_in_prose() {
        let raw = "Here you go: {\"score\": 82, \"explanation\": \"Close match.\"} Thanks";
        assert_eq!(parse_experience_rating(raw).unwrap(), 82.0);
    }

    #[test]
    fn test_parse_rating_clamps() {
        assert_eq!(parse_experience_rating("{\"score\": 140}").unwrap(), 100.0);
        assert_eq!(parse_experience_rating("{\"score\": -3}").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_rating_missing_score_is_neutral() {
        let raw = "{\"explanation\": \"not sure\"}";
        assert_eq!(parse_experience_rating(raw).unwrap(), 50.0);
    }

    #[test]
    fn test_parse_rating_without_braces_is_malformed() {
        assert!(matches!(
            parse_experience_rating("score: 80"),
            Err(StageError::MalformedModelOutput(_))
        ));
    }

    #[test]
    fn test_first_terms_takes_ten_in_order() {
        let many: TermSet = (0..15).map(|i| format!("t{i:02}")).collect();
        let joined = first_terms(&many);
        assert_eq!(joined.split(", ").count(), 10);
        assert!(joined.starts_with("t00, t01"));
    }

    #[tokio::test]
    async fn test_missing_job_keywords_score_zero() {
        let llm = Arc::new(
            ScriptedGenerator::new()
                .respond_when(
                    &["15 most important keywords", "leadership"],
                    "[\"python\", \"aws\", \"leadership\"]",
                )
                .respond_when(
                    &["15 most important keywords", "gardening"],
                    "[\"cooking\", \"gardening\"]",
                )
                .respond_when(&["specific technical and soft skills"], "[]")
                .respond_when(&["Rate how relevant"], "{\"score\": 10}")
                .respond_when(&["Write a detailed analysis"], "Weak match."),
        );
        let scorer = AtsScorer::new(llm);

        let output = scorer.score(JOB, RESUME).await;
        let report = output.value;

        assert!(output.fallbacks.is_empty());
        assert_eq!(report.keyword_score, 0.0);
        assert_eq!(
            report.missing_keywords,
            terms(&["python", "aws", "leadership"])
        );
        assert_eq!(report.skill_score, 0.0);
        assert_eq!(report.experience_score, 10.0);
        assert_eq!(report.analysis, "Weak match.");
    }

    #[tokio::test]
    async fn test_model_outage_degrades_every_part() {
        let scorer = AtsScorer::new(Arc::new(ScriptedGenerator::new()));

        let output = scorer.score(JOB, RESUME).await;
        let report = &output.value;

        // Four extractions fall back to the vocabulary, plus experience and analysis.
        assert_eq!(output.fallbacks.len(), 6);
        assert_eq!(report.experience_score, NEUTRAL_EXPERIENCE_SCORE);
        assert_eq!(report.analysis, ANALYSIS_UNAVAILABLE);
        assert_eq!(report.missing_keywords, terms(&["aws", "python"]));
        assert_eq!(report.missing_skills, terms(&["aws", "leadership", "python"]));
        // Format: too short, no experience, no skills, no year.
        assert_eq!(report.format_score, 40.0);
        // 0*0.35 + 0*0.30 + 50*0.25 + 40*0.10
        assert_eq!(report.overall_score, 16.5);
        assert!(report.recommendations[0].contains("job-specific keywords"));
        assert!(report.recommendations[1].contains("restructure"));
    }

    #[tokio::test]
    async fn test_scores_stay_in_range() {
        let llm = Arc::new(
            ScriptedGenerator::new()
                .respond_when(&["15 most important keywords"], "[\"python\"]")
                .respond_when(
                    &["specific technical and soft skills"],
                    "[\"python\", \"rust\", \"go\", \"c\", \"java\", \"zig\"]",
                )
                .respond_when(&["Rate how relevant"], "{\"score\": 250}")
                .respond_when(&["Write a detailed analysis"], "Strong."),
        );
        let scorer = AtsScorer::new(llm);

        let report = scorer.score(JOB, RESUME).await.value;

        for score in [
            report.overall_score,
            report.keyword_score,
            report.skill_score,
            report.experience_score,
            report.format_score,
        ] {
            assert!((0.0..=100.0).contains(&score), "{score} out of range");
        }
        assert_eq!(report.keyword_score, 100.0);
        assert_eq!(report.experience_score, 100.0);
    }

    #[tokio::test]
    async fn test_prompts_use_expected_temperatures() {
        let llm = Arc::new(
            ScriptedGenerator::new()
                .respond_when(&["15 most important keywords"], "[]")
                .respond_when(&["specific technical and soft skills"], "[]")
                .respond_when(&["Rate how relevant"], "{\"score\": 70}")
                .respond_when(&["Write a detailed analysis"], "Fine."),
        );
        let scorer = AtsScorer::new(llm.clone());

        scorer.score(JOB, RESUME).await;

        let calls = llm.calls();
        let temperature_of = |needle: &str| {
            calls
                .iter()
                .find(|(prompt, _)| prompt.contains(needle))
                .map(|(_, t)| *t)
                .unwrap()
        };
        assert_eq!(temperature_of("Rate how relevant"), EXPERIENCE_TEMPERATURE);
        assert_eq!(temperature_of("Write a detailed analysis"), ANALYSIS_TEMPERATURE);
        assert_eq!(calls.len(), 6);
    }

    #[tokio::test]
    async fn test_rating_prompt_keeps_placeholder_text_from_job() {
        let llm = Arc::new(
            ScriptedGenerator::new().respond_when(&["Rate how relevant"], "{\"score\": 60}"),
        );
        let scorer = AtsScorer::new(llm.clone());

        let output = scorer
            .experience_relevance("Paste your {resume_excerpt} here", "Rust engineer since 2018")
            .await;

        assert_eq!(output.value, 60.0);
        let calls = llm.calls();
        let prompt = &calls[0].0;
        assert!(prompt.contains("Paste your {resume_excerpt} here"));
        assert_eq!(prompt.matches("Rust engineer since 2018").count(), 1);
    }
}
