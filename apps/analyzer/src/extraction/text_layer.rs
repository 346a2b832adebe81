//! Structured text extraction via the pdf-extract crate.
//!
//! pdf-extract can panic on malformed input rather than returning an error, so
//! every call goes through `catch_unwind`.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::debug;

use super::{ExtractionError, PageOutcome, TextLayer};

/// Reads the embedded text layer of digital PDFs.
pub struct PdfTextLayer;

impl TextLayer for PdfTextLayer {
    fn extract_pages(&self, pdf_path: &Path) -> Result<Vec<PageOutcome>, ExtractionError> {
        let bytes = std::fs::read(pdf_path)?;

        match extract_all_pages(&bytes) {
            Ok(pages) => Ok(pages.into_iter().map(Ok).collect()),
            Err(e) => {
                debug!("Whole-document extraction failed ({e}), retrying page by page");
                extract_page_by_page(&bytes)
            }
        }
    }
}

fn extract_all_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::PdfParsing(e.to_string())),
        Err(_) => Err(ExtractionError::PdfParsing(
            "extraction panicked (malformed document)".to_string(),
        )),
    }
}

/// Opens the document once and pulls each page separately, so one bad page
/// only costs that page.
fn extract_page_by_page(bytes: &[u8]) -> Result<Vec<PageOutcome>, ExtractionError> {
    let doc = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::Document::load_mem(bytes)))
        .map_err(|_| ExtractionError::PdfParsing("loading panicked".to_string()))?
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

    Ok(page_numbers
        .into_iter()
        .map(|page| {
            match panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page]))) {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(e)) => Err(ExtractionError::PdfParsing(format!("page {page}: {e}"))),
                Err(_) => Err(ExtractionError::PagePanicked(page)),
            }
        })
        .collect())
}
