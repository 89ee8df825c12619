// All LLM prompt constants for the tailoring pipeline's generative stages.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Job analysis runs cool so the extracted lists stay stable between runs.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Synthesis runs warm to give the rewrite some latitude.
pub const SYNTHESIS_TEMPERATURE: f32 = 0.7;

/// Returned by the synthesizer when the model call fails.
pub const CONTENT_GENERATION_ERROR: &str = "An error occurred during content generation.";

/// Stands in for retrieved chunks when the collection has nothing relevant.
pub const NO_RELEVANT_EXPERIENCE: &str = "No specific relevant experience was found in the master resume for this job. \
    Make sure the master resume is complete, or rephrase the job description.";

/// Job analysis prompt. Placeholders: `{json_instruction}`, `{job_description}`.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an experienced technical recruiter. Read the job description below and identify the 5 most critical skills and the 3 most important responsibilities of the role.

Answer with a JSON object that has exactly two keys:
- "skills": a list of strings
- "responsibilities": a list of strings

{json_instruction}

JOB DESCRIPTION:
---
{job_description}
---"#;

/// Content synthesis prompt. Placeholders: `{job_description}`, `{relevant_experience}`.
pub const SYNTHESIS_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer. Tailor the candidate's resume sections to the job description below, using only the experience listed.

JOB DESCRIPTION:
---
{job_description}
---

RELEVANT EXPERIENCE FROM THE MASTER RESUME:
---
{relevant_experience}
---

Produce the following:
1. Professional Summary: 2-3 sentences aimed squarely at this role, leading with impact and key skills.
2. Experience: for each relevant experience line, write 1-2 bullet points that reuse the job's keywords, quantify results where the source allows, and make the relevance obvious.
3. Skills: a prioritised list of 8-12 skills grouped as Technical Skills, Soft Skills and Tools, drawn from the job requirements and what the experience shows.

Label each section clearly ("Professional Summary", "Experience", "Skills")."#;
