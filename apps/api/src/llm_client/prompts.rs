//! Prompt Builder — the fixed instruction template for the match
//! evaluation call. Pure string construction; inputs are interpolated
//! verbatim, no sanitization.

/// System prompt for every evaluation call.
pub const SYSTEM_PROMPT: &str = "\
    You are a career coach and resume expert. Evaluate how well my resume aligns \
    with a specific job description, incorporating any additional criteria I care about. Provide:\n\
    - A clear \"Go apply\" or \"Don't bother\" verdict and confidence level of your certainty (0-100%).\n\
    - Top strengths that align well.\n\
    - Key gaps or risks.\n\
    - Actionable suggestions to improve the resume and application.\n\
    - Tailored advice for interview preparation.\n\
    Keep the response concise, structured, and directly useful. Use bullet points where appropriate.\n\
    Use markdown format for the response.";

/// Builds the user message embedding the three inputs verbatim.
/// Deterministic: identical inputs always yield an identical string.
pub fn build_user_message(resume: &str, job_description: &str, misc_criteria: &str) -> String {
    format!(
        "<MyResume>\n{resume}\n</MyResume>\n\n\
         <JobDescription>\n{job_description}\n</JobDescription>\n\n\
         <MiscCriteria>\n{misc_criteria}\n</MiscCriteria>"
    )
}
