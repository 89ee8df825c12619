//! Workflow Orchestrator: one tailoring run, start to finish.
//!
//! Analyzing → Retrieving → Synthesizing → Scoring → Done. Stages run in order,
//! once each; every stage degrades instead of failing, so the only error a caller
//! can see is a blank job description.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ats::scorer::{AtsReport, AtsScorer};
use crate::errors::{AppError, StageError};
use crate::generation::job_analyzer::{JobAnalysis, JobAnalyzer};
use crate::generation::prompts::NO_RELEVANT_EXPERIENCE;
use crate::generation::synthesizer::ContentSynthesizer;
use crate::llm_client::prompts::excerpt;
use crate::llm_client::TextGenerator;
use crate::resume::indexer::{IngestReport, ResumeIndexer, DEFAULT_TOP_N};

/// Characters of the job description used as the query when analysis yields nothing.
const QUERY_FALLBACK_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Analyzing,
    Retrieving,
    Synthesizing,
    Scoring,
    Done,
}

impl WorkflowStage {
    /// Forward only; `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            WorkflowStage::Analyzing => WorkflowStage::Retrieving,
            WorkflowStage::Retrieving => WorkflowStage::Synthesizing,
            WorkflowStage::Synthesizing => WorkflowStage::Scoring,
            WorkflowStage::Scoring | WorkflowStage::Done => WorkflowStage::Done,
        }
    }
}

/// How one stage went.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: WorkflowStage,
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StageOutcome {
    fn record(stage: WorkflowStage, fallbacks: &[StageError]) -> Self {
        let detail = (!fallbacks.is_empty()).then(|| {
            fallbacks
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        });
        Self {
            stage,
            degraded: !fallbacks.is_empty(),
            detail,
        }
    }

    /// Marks a substitution the stage made even though nothing failed outright.
    fn with_note(mut self, note: &str) -> Self {
        self.degraded = true;
        self.detail = Some(match self.detail.take() {
            Some(existing) => format!("{existing}; {note}"),
            None => note.to_string(),
        });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorResult {
    pub run_id: Uuid,
    pub tailored_resume: String,
    pub ats_score: AtsReport,
    pub stages: Vec<StageOutcome>,
}

/// Skills then responsibilities joined by spaces; `None` if that leaves nothing to search for.
pub fn analysis_query(analysis: &JobAnalysis) -> Option<String> {
    let query = analysis
        .search_terms()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!query.is_empty()).then_some(query)
}

/// The retrieved chunks, or the single placeholder when there are none.
pub fn grounding_chunks(retrieved: Vec<String>) -> Vec<String> {
    if retrieved.is_empty() {
        vec![NO_RELEVANT_EXPERIENCE.to_string()]
    } else {
        retrieved
    }
}

pub struct TailoringOrchestrator {
    indexer: Arc<ResumeIndexer>,
    analyzer: JobAnalyzer,
    synthesizer: ContentSynthesizer,
    scorer: AtsScorer,
}

impl TailoringOrchestrator {
    pub fn new(indexer: Arc<ResumeIndexer>, llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            indexer,
            analyzer: JobAnalyzer::new(llm.clone()),
            synthesizer: ContentSynthesizer::new(llm.clone()),
            scorer: AtsScorer::new(llm),
        }
    }

    pub fn indexer(&self) -> &ResumeIndexer {
        &self.indexer
    }

    pub async fn ingest_master_resume(&self, resume_text: &str) -> Result<IngestReport, AppError> {
        self.indexer.ingest(resume_text).await
    }

    /// Runs the full pipeline for one job description.
    /// Works without an ingested resume: retrieval then falls back to the placeholder.
    pub async fn tailor_resume(&self, job_description: &str) -> Result<TailorResult, AppError> {
        if job_description.trim().is_empty() {
            return Err(AppError::EmptyInput(
                "job description cannot be empty".to_string(),
            ));
        }

        let run_id = Uuid::new_v4();
        let mut stages = Vec::with_capacity(4);
        let mut stage = WorkflowStage::Analyzing;
        info!("Tailoring run {run_id} started");

        // ── Analyzing ───────────────────────────────────────────────────────
        info!("Run {run_id}: {stage:?}");
        let analysis = self.analyzer.analyze(job_description).await;
        let mut outcome = StageOutcome::record(stage, &analysis.fallbacks);
        let query = match analysis_query(&analysis.value) {
            Some(query) => query,
            None => {
                warn!("No skills or responsibilities extracted; searching with the job description");
                outcome = outcome.with_note("searched with the start of the job description");
                excerpt(job_description, QUERY_FALLBACK_CHARS).to_string()
            }
        };
        stages.push(outcome);
        stage = stage.next();

        // ── Retrieving ──────────────────────────────────────────────────────
        info!("Run {run_id}: {stage:?}");
        let retrieved = self.indexer.retrieve(&query, DEFAULT_TOP_N).await;
        let mut outcome = StageOutcome::record(stage, &retrieved.fallbacks);
        if retrieved.value.is_empty() {
            warn!("No relevant resume chunks found; synthesizing with limited context");
            outcome = outcome.with_note("no relevant experience found; used placeholder");
        }
        let chunks = grounding_chunks(retrieved.value);
        stages.push(outcome);
        stage = stage.next();

        // ── Synthesizing ────────────────────────────────────────────────────
        info!("Run {run_id}: {stage:?}");
        let synthesized = self.synthesizer.synthesize(job_description, &chunks).await;
        stages.push(StageOutcome::record(stage, &synthesized.fallbacks));
        let tailored_resume = synthesized.value;
        stage = stage.next();

        // ── Scoring ─────────────────────────────────────────────────────────
        info!("Run {run_id}: {stage:?}");
        let scored = self.scorer.score(job_description, &tailored_resume).await;
        stages.push(StageOutcome::record(stage, &scored.fallbacks));
        stage = stage.next();

        let degraded = stages.iter().filter(|s| s.degraded).count();
        info!(
            "Run {run_id}: {stage:?} (overall ATS {}, {degraded} degraded stages)",
            scored.value.overall_score
        );

        Ok(TailorResult {
            run_id,
            tailored_resume,
            ats_score: scored.value,
            stages,
        })
    }
}
