//! The upload pipeline: stage → extract → analyze.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::{stage, ResumeUpload};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub request_id: Uuid,
    pub file_name: String,
    pub extracted_characters: usize,
    pub job_description_supplied: bool,
    pub model: String,
    pub analysis: String,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionPreview {
    pub request_id: Uuid,
    pub file_name: String,
    pub characters: usize,
    pub text: String,
}

/// Stages the upload, extracts its text, and removes the staged file before returning.
async fn extract_upload(
    state: &AppState,
    request_id: Uuid,
    upload: &ResumeUpload,
) -> Result<String, AppError> {
    let staged = stage(&state.config.upload_dir, request_id, upload.bytes.clone()).await?;
    let text = state.extractor.extract(staged.path()).await;
    debug!(request_id = %staged.request_id(), "Removing staged resume");
    drop(staged);

    info!(
        %request_id,
        file_name = %upload.file_name,
        characters = text.chars().count(),
        "Extracted resume text"
    );
    Ok(text)
}

/// Runs extraction only, without contacting the model.
pub async fn preview_upload(
    state: &AppState,
    upload: ResumeUpload,
) -> Result<ExtractionPreview, AppError> {
    let request_id = Uuid::new_v4();
    let text = extract_upload(state, request_id, &upload).await?;

    Ok(ExtractionPreview {
        request_id,
        file_name: upload.file_name,
        characters: text.chars().count(),
        text,
    })
}

/// Full pipeline for one upload. Each call is isolated: its own request id and staged file.
pub async fn analyze_upload(
    state: &AppState,
    upload: ResumeUpload,
) -> Result<AnalysisReport, AppError> {
    let request_id = Uuid::new_v4();
    let text = extract_upload(state, request_id, &upload).await?;

    let analysis = state
        .analyzer
        .analyze(&text, upload.job_description.as_deref())
        .await?;

    info!(%request_id, "Analysis complete");

    Ok(AnalysisReport {
        request_id,
        file_name: upload.file_name,
        extracted_characters: text.chars().count(),
        job_description_supplied: upload.job_description.is_some(),
        model: state.analyzer.model_name().to_string(),
        analysis,
        analyzed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, FakeModel};
    use bytes::Bytes;
    use std::sync::Arc;

    fn upload(job_description: Option<&str>) -> ResumeUpload {
        ResumeUpload {
            file_name: "resume.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
            job_description: job_description.map(String::from),
        }
    }

    fn staged_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_two_page_resume_with_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(FakeModel::replying("  Strong match for backend roles.\n"));
        let state = test_state(
            dir.path().to_path_buf(),
            vec!["Name: A. Smith", "Skills: Go, networking"],
            vec![],
            model.clone(),
        );

        let report = analyze_upload(&state, upload(Some("Backend engineer, Go, networking")))
            .await
            .unwrap();

        assert_eq!(report.analysis, "Strong match for backend roles.");
        assert_eq!(report.file_name, "resume.pdf");
        assert!(report.job_description_supplied);
        assert_eq!(report.model, "fake-model");
        assert_eq!(
            report.extracted_characters,
            "Name: A. SmithSkills: Go, networking".len()
        );

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Name: A. SmithSkills: Go, networking"));
        assert!(prompts[0].contains("Backend engineer, Go, networking"));
        assert_eq!(staged_files(dir.path()), 0, "staged file must be removed");
    }

    #[tokio::test]
    async fn test_unreadable_resume_surfaces_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(FakeModel::replying("unused"));
        let state = test_state(dir.path().to_path_buf(), vec![""], vec![""], model.clone());

        let err = analyze_upload(&state, upload(None)).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(model.prompts().is_empty());
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_service_failure_surfaces_cause() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(FakeModel::failing(403, "API key not valid"));
        let state = test_state(dir.path().to_path_buf(), vec!["Name: A. Smith"], vec![], model);

        let err = analyze_upload(&state, upload(None)).await.unwrap_err();

        assert!(matches!(err, AppError::Llm(ref msg) if msg.contains("API key not valid")));
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_preview_uses_ocr_text_for_scanned_resume() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(FakeModel::replying("unused"));
        let state = test_state(
            dir.path().to_path_buf(),
            vec![""],
            vec!["Experience: 5 years"],
            model.clone(),
        );

        let preview = preview_upload(&state, upload(None)).await.unwrap();

        assert_eq!(preview.text, "Experience: 5 years");
        assert_eq!(preview.characters, 19);
        assert!(model.prompts().is_empty());
    }
}
