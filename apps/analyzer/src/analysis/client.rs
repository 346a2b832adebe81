//! Analysis Client — turns resume text (and an optional job description) into
//! a natural-language fit analysis via one model call.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::prompts::build_analysis_prompt;
use crate::llm_client::{GenerativeModel, LlmError};

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No resume text to analyze. Raised before any network call.
    #[error("Resume text is required for analysis.")]
    MissingResumeText,

    #[error(transparent)]
    Service(#[from] LlmError),
}

#[derive(Clone)]
pub struct AnalysisClient {
    model: Arc<dyn GenerativeModel>,
}

impl AnalysisClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Returns the model's analysis, trimmed. A blank job description is treated
    /// as absent. Service failures are returned as-is, never retried.
    pub async fn analyze(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<String, AnalysisError> {
        if resume_text.trim().is_empty() {
            return Err(AnalysisError::MissingResumeText);
        }

        let job_description = job_description.filter(|jd| !jd.trim().is_empty());
        let prompt = build_analysis_prompt(resume_text, job_description);

        info!(
            model = self.model.model_name(),
            with_job_description = job_description.is_some(),
            "Requesting resume analysis"
        );

        let response = self.model.generate(&prompt).await.map_err(|e| {
            warn!("Resume analysis failed: {e}");
            AnalysisError::Service(e)
        })?;

        Ok(response.trim().to_string())
    }
}
