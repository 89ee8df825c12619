//! Deterministic ATS arithmetic: overlap scores, format checks, weighting and
//! recommendations. No model calls in here.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Normalised (lowercase, trimmed, deduplicated) keywords or skills.
pub type TermSet = BTreeSet<String>;

pub const KEYWORD_WEIGHT: f64 = 0.35;
pub const SKILL_WEIGHT: f64 = 0.30;
pub const EXPERIENCE_WEIGHT: f64 = 0.25;
pub const FORMAT_WEIGHT: f64 = 0.10;

/// Per extra resume skill (not asked for by the job).
pub const SKILL_BONUS_PER_EXTRA: f64 = 0.05;
pub const MAX_SKILL_BONUS: f64 = 0.20;

pub const FORMAT_PENALTY: f64 = 15.0;
pub const MIN_CONTENT_CHARS: usize = 100;
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Missing-keyword count above which the recommendations name them.
const MISSING_KEYWORD_ALERT: usize = 5;

static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("year pattern is valid"));

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Halves go to the even tenth: 10.25 becomes 10.2, 10.75 becomes 10.8.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Share of job keywords present in the resume, as a percentage.
/// 0 when the job side has no keywords.
pub fn keyword_score(job: &TermSet, resume: &TermSet) -> f64 {
    if job.is_empty() {
        return 0.0;
    }
    let matched = job.intersection(resume).count();
    clamp_score(matched as f64 / job.len() as f64 * 100.0)
}

/// Share of job skills present in the resume, plus a capped bonus for extra
/// resume skills the job did not ask for. 0 when the job side has no skills.
pub fn skill_score(job: &TermSet, resume: &TermSet) -> f64 {
    if job.is_empty() {
        return 0.0;
    }
    let match_ratio = job.intersection(resume).count() as f64 / job.len() as f64;
    let extras = resume.difference(job).count() as f64;
    let bonus = (extras * SKILL_BONUS_PER_EXTRA).min(MAX_SKILL_BONUS);
    clamp_score((match_ratio + bonus) * 100.0)
}

/// One deterministic format check.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatCheck {
    pub description: &'static str,
    pub passed: bool,
}

pub fn format_checks(content: &str) -> Vec<FormatCheck> {
    let length = content.chars().count();
    let lowered = content.to_lowercase();

    vec![
        FormatCheck {
            description: "Resume has sufficient content",
            passed: length > MIN_CONTENT_CHARS,
        },
        FormatCheck {
            description: "Resume is not too long",
            passed: length < MAX_CONTENT_CHARS,
        },
        FormatCheck {
            description: "Contains an experience section",
            passed: lowered.contains("experience"),
        },
        FormatCheck {
            description: "Contains a skills section",
            passed: lowered.contains("skills"),
        },
        FormatCheck {
            description: "No special characters",
            passed: content.is_ascii(),
        },
        FormatCheck {
            description: "Contains years of experience",
            passed: YEAR_PATTERN.is_match(content),
        },
    ]
}

/// 100 minus `FORMAT_PENALTY` per failed check, floored at 0.
pub fn format_score(content: &str) -> f64 {
    let failed: Vec<&'static str> = format_checks(content)
        .into_iter()
        .filter(|check| !check.passed)
        .map(|check| check.description)
        .collect();
    if !failed.is_empty() {
        debug!("Failed format checks: {}", failed.join(", "));
    }
    clamp_score(100.0 - FORMAT_PENALTY * failed.len() as f64)
}

/// Weighted sum of the four sub-scores, rounded to one decimal.
pub fn overall_score(keyword: f64, skill: f64, experience: f64, format: f64) -> f64 {
    let weighted = keyword * KEYWORD_WEIGHT
        + skill * SKILL_WEIGHT
        + experience * EXPERIENCE_WEIGHT
        + format * FORMAT_WEIGHT;
    clamp_score(round_to_tenth(weighted))
}

/// Job-side terms the resume lacks.
pub fn missing_terms(job: &TermSet, resume: &TermSet) -> TermSet {
    job.difference(resume).cloned().collect()
}

/// Rule-based advice. The first two rules stack; exactly one of the last three applies.
pub fn recommendations(missing_keywords: &TermSet, overall: f64) -> Vec<String> {
    let mut advice = Vec::new();

    if overall < 70.0 {
        advice.push(
            "Overall ATS score is below the optimal range. Incorporate more job-specific keywords."
                .to_string(),
        );
    }

    if missing_keywords.len() > MISSING_KEYWORD_ALERT {
        let named: Vec<&str> = missing_keywords
            .iter()
            .take(MISSING_KEYWORD_ALERT)
            .map(String::as_str)
            .collect();
        advice.push(format!(
            "Add {} missing keywords: {}",
            missing_keywords.len(),
            named.join(", ")
        ));
    }

    if overall < 50.0 {
        advice.push(
            "Significantly restructure the resume to better align with the job requirements."
                .to_string(),
        );
    } else if overall < 80.0 {
        advice.push(
            "Make minor adjustments to improve keyword matching and skill alignment.".to_string(),
        );
    } else {
        advice.push("Resume is ATS-optimized. Focus on interview preparation.".to_string());
    }

    advice
}
