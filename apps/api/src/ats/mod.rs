// ATS scoring: approximates how an applicant tracking system would rank a
// tailored resume against a job description.
// Term extraction is model-first with a vocabulary fallback; the arithmetic in
// scoring.rs is pure and deterministic.

pub mod extraction;
pub mod prompts;
pub mod scorer;
pub mod scoring;
