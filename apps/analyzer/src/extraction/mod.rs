//! Text Extractor: turns an uploaded PDF into plain text.
//!
//! Two stages:
//! 1. Structured extraction from the embedded text layer (`TextLayer`).
//! 2. If that yields nothing but whitespace, rasterize every page
//!    (`PageRasterizer`) and run OCR on each image (`OcrEngine`).
//!
//! Failures in either stage are logged and never leave `TextExtractor::extract`.
//! The worst case is an empty string.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod ocr;
pub mod text_layer;

pub use ocr::{PdftoppmRasterizer, TesseractOcr};
pub use text_layer::PdfTextLayer;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Text extraction panicked on page {0}")]
    PagePanicked(u32),

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("External tool '{0}' could not be started")]
    ToolMissing(String),
}

/// Result of extracting one page from the text layer.
pub type PageOutcome = Result<String, ExtractionError>;

/// A rendered page, held in memory only for the duration of OCR.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 1-based page number.
    pub page_number: u32,
    pub png: Bytes,
}

/// Reads the embedded text layer of a PDF.
///
/// CPU-bound; callers run it inside `tokio::task::spawn_blocking`.
pub trait TextLayer: Send + Sync {
    /// One outcome per page, in document order. The outer error means the
    /// document could not be opened at all.
    fn extract_pages(&self, pdf_path: &Path) -> Result<Vec<PageOutcome>, ExtractionError>;
}

/// Renders every page of a PDF to an image.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Pages in document order.
    async fn rasterize(&self, pdf_path: &Path) -> Result<Vec<PageImage>, ExtractionError>;
}

/// Recognizes text in one page image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, page: &PageImage) -> Result<String, ExtractionError>;
}

/// Two-stage text extractor. Cheap to clone.
#[derive(Clone)]
pub struct TextExtractor {
    text_layer: Arc<dyn TextLayer>,
    rasterizer: Arc<dyn PageRasterizer>,
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(
        text_layer: Arc<dyn TextLayer>,
        rasterizer: Arc<dyn PageRasterizer>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            text_layer,
            rasterizer,
            ocr,
        }
    }

    /// Best-effort plain text of the document at `pdf_path`, trimmed.
    /// Never fails; an unreadable document yields an empty string.
    pub async fn extract(&self, pdf_path: &Path) -> String {
        let structured = self.extract_structured(pdf_path.to_path_buf()).await;
        if !structured.trim().is_empty() {
            debug!(
                "Structured extraction produced {} characters",
                structured.trim().len()
            );
            return structured.trim().to_string();
        }

        info!("No embedded text found, falling back to OCR");
        self.extract_with_ocr(pdf_path).await.trim().to_string()
    }

    async fn extract_structured(&self, pdf_path: PathBuf) -> String {
        let text_layer = Arc::clone(&self.text_layer);
        let pages = tokio::task::spawn_blocking(move || text_layer.extract_pages(&pdf_path)).await;

        let pages = match pages {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                warn!("Direct text extraction failed: {e}");
                return String::new();
            }
            Err(e) => {
                warn!("Direct text extraction task failed: {e}");
                return String::new();
            }
        };

        let mut text = String::new();
        for (index, page) in pages.into_iter().enumerate() {
            match page {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => warn!(page = index + 1, "Skipping page in direct extraction: {e}"),
            }
        }
        text
    }

    async fn extract_with_ocr(&self, pdf_path: &Path) -> String {
        let pages = match self.rasterizer.rasterize(pdf_path).await {
            Ok(pages) => pages,
            Err(e) => {
                warn!("OCR failed: {e}");
                return String::new();
            }
        };

        let mut text = String::new();
        for page in &pages {
            match self.ocr.recognize(page).await {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => warn!(page = page.page_number, "OCR failed: {e}"),
            }
        }
        text
    }
}
