// Prompt constants for resume analysis.

/// Always sent. Replace `{resume_text}` before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyst. Review the resume below and give a detailed assessment of the candidate: strengths, weaknesses, notable skills and experience, and how well the resume would hold up against typical job requirements for the roles it targets.

Resume:
{resume_text}
"#;

/// Appended only when a job description is supplied. Replace `{job_description}`.
pub const JOB_DESCRIPTION_BLOCK_TEMPLATE: &str = r#"
Additionally, evaluate the resume against the following job description.

Job Description:
{job_description}

Highlight the key skills, experiences, and qualifications that make the candidate a good fit for this job, and call out any requirements the resume does not cover.
"#;

/// Builds the full prompt. `job_description` must already be filtered to a non-blank value.
pub fn build_analysis_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    if let Some(jd) = job_description {
        prompt.push_str(&JOB_DESCRIPTION_BLOCK_TEMPLATE.replace("{job_description}", jd));
    }
    prompt
}
