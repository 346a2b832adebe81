//! Axum route handlers for the JSON analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::analysis::pipeline::{analyze_upload, preview_upload, AnalysisReport, ExtractionPreview};
use crate::errors::AppError;
use crate::ingest::read_upload;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Multipart form with a `resume` PDF and an optional `job_description`.
/// Returns the model's analysis of the resume.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let upload = read_upload(multipart).await?;
    let report = analyze_upload(&state, upload).await?;
    Ok(Json(report))
}

/// POST /api/v1/extract
///
/// Same form as `/analyze`, but stops after text extraction.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractionPreview>, AppError> {
    let upload = read_upload(multipart).await?;
    let preview = preview_upload(&state, upload).await?;
    Ok(Json(preview))
}
