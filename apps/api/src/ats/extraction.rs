//! Term extraction: pluggable strategies that turn free text into a `TermSet`.
//!
//! `ModelTermExtractor` asks the LLM for a JSON array; `VocabularyTermExtractor`
//! matches a fixed regex vocabulary. `FallbackExtractor` runs them in that order.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::ats::prompts::{
    EXTRACTION_TEMPERATURE, KEYWORD_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_PROMPT_TEMPLATE,
};
use crate::ats::scoring::TermSet;
use crate::errors::{StageError, StageOutput};
use crate::llm_client::prompts::{fill_template, JSON_ARRAY_INSTRUCTION};
use crate::llm_client::{extract_json_array, TextGenerator};

// ────────────────────────────────────────────────────────────────────────────
// Vocabularies
// ────────────────────────────────────────────────────────────────────────────

const TECHNOLOGY_TERMS: &str = r"\b(python|java|javascript|react|node\.js|aws|docker|kubernetes|sql|nosql|api|rest|graphql|microservices|agile|scrum|devops|ci/cd|git|jenkins|postgresql|mongodb|redis|elasticsearch|kafka|spark|hadoop|machine learning|ai|data science|cloud|azure|gcp)\b";

const ACTION_TERMS: &str = r"\b(lead|manage|develop|implement|design|architect|optimize|deploy|maintain|test|debug|analyze|plan|coordinate|mentor|train|supervise|direct|oversee|facilitate)\b";

const ROLE_TERMS: &str = r"\b(senior|junior|principal|staff|lead|manager|director|architect|engineer|developer|analyst|consultant|specialist)\b";

const FRAMEWORK_TERMS: &str = r"\b(python|java|javascript|typescript|react|angular|vue|node\.js|express|django|flask|fastapi|spring|hibernate|aws|azure|gcp|docker|kubernetes|jenkins|git|postgresql|mysql|mongodb|redis|elasticsearch|kafka|spark|hadoop|tensorflow|pytorch|scikit-learn)\b";

const PRACTICE_TERMS: &str = r"\b(leadership|communication|problem solving|teamwork|collaboration|time management|project management|agile|scrum|kanban|devops|ci/cd|tdd|bdd|code review|mentoring|presentation|negotiation|analytical thinking|creativity)\b";

static KEYWORD_VOCABULARY: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[TECHNOLOGY_TERMS, ACTION_TERMS, ROLE_TERMS]));

static SKILL_VOCABULARY: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[FRAMEWORK_TERMS, PRACTICE_TERMS]));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("vocabulary pattern is valid"))
        .collect()
}

/// What a given extractor is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Keywords,
    Skills,
}

impl TermKind {
    fn prompt_template(self) -> &'static str {
        match self {
            TermKind::Keywords => KEYWORD_EXTRACTION_PROMPT_TEMPLATE,
            TermKind::Skills => SKILL_EXTRACTION_PROMPT_TEMPLATE,
        }
    }

    fn vocabulary(self) -> &'static [Regex] {
        match self {
            TermKind::Keywords => KEYWORD_VOCABULARY.as_slice(),
            TermKind::Skills => SKILL_VOCABULARY.as_slice(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            TermKind::Keywords => "keyword",
            TermKind::Skills => "skill",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy trait
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TermExtractor: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    async fn extract(&self, text: &str) -> Result<TermSet, StageError>;
}

/// Lowercases and trims terms, dropping blanks. Duplicates collapse in the set.
pub fn normalize_terms<I, S>(terms: I) -> TermSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Parses the first-`[`-to-last-`]` slice of a model reply as a list of strings.
pub fn parse_term_list(raw: &str) -> Result<TermSet, StageError> {
    let json = extract_json_array(raw).ok_or_else(|| {
        StageError::MalformedModelOutput("no JSON array found in model reply".to_string())
    })?;
    let terms: Vec<String> = serde_json::from_str(json)?;
    Ok(normalize_terms(terms))
}

// ────────────────────────────────────────────────────────────────────────────
// ModelTermExtractor
// ────────────────────────────────────────────────────────────────────────────

pub struct ModelTermExtractor {
    llm: Arc<dyn TextGenerator>,
    kind: TermKind,
}

impl ModelTermExtractor {
    pub fn new(llm: Arc<dyn TextGenerator>, kind: TermKind) -> Self {
        Self { llm, kind }
    }
}

#[async_trait]
impl TermExtractor for ModelTermExtractor {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn extract(&self, text: &str) -> Result<TermSet, StageError> {
        let prompt = fill_template(
            self.kind.prompt_template(),
            &[("json_instruction", JSON_ARRAY_INSTRUCTION), ("text", text)],
        );
        let raw = self.llm.generate(&prompt, EXTRACTION_TEMPERATURE).await?;
        parse_term_list(&raw)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// VocabularyTermExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Regex matching over a fixed vocabulary. Never fails.
pub struct VocabularyTermExtractor {
    patterns: &'static [Regex],
}

impl VocabularyTermExtractor {
    pub fn new(kind: TermKind) -> Self {
        Self {
            patterns: kind.vocabulary(),
        }
    }

    pub fn matches(&self, text: &str) -> TermSet {
        let lowered = text.to_lowercase();
        self.patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(&lowered))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl TermExtractor for VocabularyTermExtractor {
    fn name(&self) -> &'static str {
        "vocabulary"
    }

    async fn extract(&self, text: &str) -> Result<TermSet, StageError> {
        Ok(self.matches(text))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FallbackExtractor
// ────────────────────────────────────────────────────────────────────────────

/// Runs `primary`, and `secondary` only if `primary` fails.
pub struct FallbackExtractor {
    label: &'static str,
    primary: Box<dyn TermExtractor>,
    secondary: Box<dyn TermExtractor>,
}

impl FallbackExtractor {
    /// Model first, vocabulary second.
    pub fn new(llm: Arc<dyn TextGenerator>, kind: TermKind) -> Self {
        Self::with_strategies(
            kind,
            Box::new(ModelTermExtractor::new(llm, kind)),
            Box::new(VocabularyTermExtractor::new(kind)),
        )
    }

    pub fn with_strategies(
        kind: TermKind,
        primary: Box<dyn TermExtractor>,
        secondary: Box<dyn TermExtractor>,
    ) -> Self {
        Self {
            label: kind.label(),
            primary,
            secondary,
        }
    }

    pub async fn extract(&self, text: &str) -> StageOutput<TermSet> {
        let primary_error = match self.primary.extract(text).await {
            Ok(terms) => return StageOutput::ok(terms),
            Err(e) => e,
        };
        warn!(
            "{} {} extraction failed, falling back to {}: {primary_error}",
            self.primary.name(),
            self.label,
            self.secondary.name()
        );

        match self.secondary.extract(text).await {
            Ok(terms) => StageOutput {
                value: terms,
                fallbacks: vec![primary_error],
            },
            Err(secondary_error) => {
                warn!(
                    "{} {} extraction failed too: {secondary_error}",
                    self.secondary.name(),
                    self.label
                );
                StageOutput {
                    value: TermSet::new(),
                    fallbacks: vec![primary_error, secondary_error],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGenerator;

    fn terms(items: &[&str]) -> TermSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct AlwaysFails;

    #[async_trait]
    impl TermExtractor for AlwaysFails {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn extract(&self, _text: &str) -> Result<TermSet, StageError> {
            Err(StageError::ServiceUnavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_parse_term_list_normalizes() {
        let raw = "Keywords:\n[\" Python \", \"AWS\", \"python\", \"  \"]\nDone.";
        assert_eq!(parse_term_list(raw).unwrap(), terms(&["aws", "python"]));
    }

    #[test]
    fn test_parse_term_list_without_brackets_is_malformed() {
        let result = parse_term_list("python, aws");
        assert!(matches!(result, Err(StageError::MalformedModelOutput(_))));
    }

    #[test]
    fn test_parse_term_list_rejects_non_strings() {
        let result = parse_term_list("[1, 2, 3]");
        assert!(matches!(result, Err(StageError::MalformedModelOutput(_))));
    }

    #[test]
    fn test_parse_term_list_empty_array_is_valid() {
        assert!(parse_term_list("[]").unwrap().is_empty());
    }

    #[test]
    fn test_keyword_vocabulary_matches() {
        let extractor = VocabularyTermExtractor::new(TermKind::Keywords);
        let found = extractor.matches(
            "Senior Engineer to design microservices in Python on AWS with CI/CD and Node.js",
        );
        for expected in [
            "senior",
            "engineer",
            "design",
            "microservices",
            "python",
            "aws",
            "ci/cd",
            "node.js",
        ] {
            assert!(found.contains(expected), "missing {expected} in {found:?}");
        }
    }

    #[test]
    fn test_vocabulary_requires_word_boundaries() {
        let extractor = VocabularyTermExtractor::new(TermKind::Keywords);
        let found = extractor.matches("javascript developers");
        assert!(found.contains("javascript"));
        assert!(!found.contains("java"));
        assert!(!found.contains("developer"));
    }

    #[test]
    fn test_skill_vocabulary_matches_soft_skills() {
        let extractor = VocabularyTermExtractor::new(TermKind::Skills);
        let found = extractor.matches("Strong Leadership, problem solving and PyTorch experience");
        assert_eq!(found, terms(&["leadership", "problem solving", "pytorch"]));
    }

    #[tokio::test]
    async fn test_model_extractor_uses_low_temperature() {
        let llm = Arc::new(
            ScriptedGenerator::new().respond_when(&["15 most important keywords"], "[\"Rust\"]"),
        );
        let extractor = ModelTermExtractor::new(llm.clone(), TermKind::Keywords);

        let found = extractor.extract("We use Rust").await.unwrap();

        assert_eq!(found, terms(&["rust"]));
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("We use Rust"));
        assert!((calls[0].1 - EXTRACTION_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_fallback_prefers_model_answer() {
        let llm = Arc::new(
            ScriptedGenerator::new().respond_when(&["specific technical and soft skills"], "[\"Go\"]"),
        );
        let extractor = FallbackExtractor::new(llm, TermKind::Skills);

        let output = extractor.extract("Python and Kafka").await;

        assert_eq!(output.value, terms(&["go"]));
        assert!(!output.is_degraded());
    }

    #[tokio::test]
    async fn test_fallback_uses_vocabulary_when_model_unavailable() {
        let extractor = FallbackExtractor::new(Arc::new(ScriptedGenerator::new()), TermKind::Skills);

        let output = extractor.extract("Python and Kafka").await;

        assert_eq!(output.value, terms(&["kafka", "python"]));
        assert_eq!(output.fallbacks.len(), 1);
        assert!(matches!(
            output.fallbacks[0],
            StageError::ServiceUnavailable(_)
        ));
    }

    #[tokio::test]
    async fn test_fallback_uses_vocabulary_on_malformed_reply() {
        let llm = Arc::new(
            ScriptedGenerator::new()
                .respond_when(&["15 most important keywords"], "Sorry, I cannot do that."),
        );
        let extractor = FallbackExtractor::new(llm, TermKind::Keywords);

        let output = extractor.extract("Deploy Docker images").await;

        assert_eq!(output.value, terms(&["deploy", "docker"]));
        assert!(matches!(
            output.fallbacks[0],
            StageError::MalformedModelOutput(_)
        ));
    }

    #[tokio::test]
    async fn test_both_strategies_failing_yields_empty_set() {
        let extractor = FallbackExtractor::with_strategies(
            TermKind::Keywords,
            Box::new(AlwaysFails),
            Box::new(AlwaysFails),
        );

        let output = extractor.extract("anything").await;

        assert!(output.value.is_empty());
        assert_eq!(output.fallbacks.len(), 2);
    }
}
