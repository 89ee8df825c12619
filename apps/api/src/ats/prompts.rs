// Prompt templates for the ATS scorer.
// Placeholders are filled with `llm_client::prompts::fill_template` before sending.

/// Temperature for keyword and skill extraction. Kept low for repeatable lists.
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;
pub const EXPERIENCE_TEMPERATURE: f32 = 0.3;
pub const ANALYSIS_TEMPERATURE: f32 = 0.4;

/// Returned in place of the narrative analysis when the model call fails.
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis could not be generated due to an error.";

/// Keyword extraction. Placeholders: `{json_instruction}`, `{text}`.
pub const KEYWORD_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the 15 most important keywords from the text below.
Prioritise:
- technical terms and industry terminology
- tools and technologies
- action verbs
- qualifications and requirements

TEXT:
{text}

{json_instruction}"#;

/// Skill extraction. Placeholders: `{json_instruction}`, `{text}`.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the specific technical and soft skills mentioned in the text below.
Prioritise:
- programming languages
- frameworks and tools
- soft skills
- certifications
- methodologies

TEXT:
{text}

{json_instruction}"#;

/// Experience relevance rating. Placeholders: `{json_instruction}`, `{job_excerpt}`, `{resume_excerpt}`.
pub const EXPERIENCE_RELEVANCE_PROMPT_TEMPLATE: &str = r#"Rate how relevant the experience in this resume is to the job below.
Consider:
- how closely past roles match the target position
- whether past responsibilities line up with the job requirements
- quantified achievements that address the job's needs

JOB DESCRIPTION (excerpt):
{job_excerpt}...

RESUME (excerpt):
{resume_excerpt}...

Give a score from 0 to 100 and a one-sentence explanation, shaped exactly as:
{"score": 75, "explanation": "..."}
{json_instruction}"#;

/// Narrative match analysis. Placeholders: `{job_keywords}`, `{resume_keywords}`.
pub const DETAILED_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Write a detailed analysis of how well a tailored resume matches a job description.
Cover:
1. keyword alignment and coverage
2. skill matches and gaps
3. relevance of the experience
4. overall fit for the position

Job description keywords: {job_keywords}
Resume keywords: {resume_keywords}

Keep it to 2-3 concise paragraphs that name the strengths and the areas to improve."#;
