//! Presentation layer: one HTML page with the upload form and the result.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use tracing::warn;

use crate::analysis::pipeline::analyze_upload;
use crate::ingest::read_upload;
use crate::state::AppState;

pub mod page;

use page::{render_page, Outcome};

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render_page(&Outcome::Empty, ""))
}

/// POST /analyze
///
/// Always answers with the full page so the form stays usable after a failure.
pub async fn handle_analyze_form(
    State(state): State<AppState>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            let page = render_page(
                &Outcome::Failure {
                    message: e.user_message(),
                },
                "",
            );
            return (e.status_code(), Html(page));
        }
    };

    let job_description = upload.job_description.clone().unwrap_or_default();
    match analyze_upload(&state, upload).await {
        Ok(report) => {
            let outcome = Outcome::Success {
                file_name: report.file_name,
                analysis: report.analysis,
            };
            (StatusCode::OK, Html(render_page(&outcome, &job_description)))
        }
        Err(e) => {
            warn!("Analysis request failed: {e}");
            let outcome = Outcome::Failure {
                message: e.user_message(),
            };
            (e.status_code(), Html(render_page(&outcome, &job_description)))
        }
    }
}
