//! Document Ingestor — decodes the multipart upload and stages the PDF in a
//! per-request temporary file that is deleted when dropped.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// One uploaded resume plus the optional job description from the same form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
    /// `None` when the field was missing or blank.
    pub job_description: Option<String>,
}

/// Reads the `resume` file and `job_description` text fields. Unknown fields are ignored.
pub async fn read_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed upload", e))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);
                if !is_pdf(&file_name, content_type.as_deref()) {
                    return Err(AppError::Validation(format!(
                        "{file_name} is not a PDF. Please upload a resume in PDF format."
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Could not read upload", e))?;
                file = Some((file_name, bytes));
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Could not read job description", e))?;
                job_description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| {
        AppError::Validation("Please upload a resume in PDF format.".to_string())
    })?;

    Ok(ResumeUpload {
        file_name,
        bytes,
        job_description,
    })
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded file exceeds the size limit.".to_string())
    } else {
        AppError::Validation(format!("{context}: {}", err.body_text()))
    }
}

fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf")
        || content_type.is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}

/// A resume written to disk for the duration of one request.
/// The file is removed when this value is dropped, on success or failure.
#[derive(Debug)]
pub struct StagedDocument {
    request_id: Uuid,
    file: NamedTempFile,
}

impl StagedDocument {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

/// Writes `bytes` to a fresh `resume-<request_id>-*.pdf` file in `dir`.
pub async fn stage(
    dir: &Path,
    request_id: Uuid,
    bytes: Bytes,
) -> Result<StagedDocument, AppError> {
    let dir: PathBuf = dir.to_path_buf();
    let file = tokio::task::spawn_blocking(move || -> anyhow::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("resume-{request_id}-"))
            .suffix(".pdf")
            .tempfile_in(&dir)
            .with_context(|| format!("Failed to create staging file in {}", dir.display()))?;
        file.write_all(&bytes).context("Failed to write staged resume")?;
        file.flush().context("Failed to flush staged resume")?;
        Ok(file)
    })
    .await
    .context("Staging task panicked")??;

    debug!("Staged resume for request {request_id} at {}", file.path().display());
    Ok(StagedDocument { request_id, file })
}
