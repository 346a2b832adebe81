//! OCR fallback for image-only PDFs.
//!
//! Pages are rendered with poppler's `pdftoppm` and recognized with the
//! `tesseract` CLI. Both binaries must be on PATH (or configured explicitly).

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{ExtractionError, OcrEngine, PageImage, PageRasterizer};

const PAGE_PREFIX: &str = "page";

/// Renders pages to PNG with `pdftoppm`. Images live in a temporary directory
/// only until they are read back into memory.
pub struct PdftoppmRasterizer {
    program: String,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(program: impl Into<String>, dpi: u32) -> Self {
        Self {
            program: program.into(),
            dpi,
        }
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn rasterize(&self, pdf_path: &Path) -> Result<Vec<PageImage>, ExtractionError> {
        let out_dir = tempfile::tempdir()?;
        let prefix = out_dir.path().join(PAGE_PREFIX);

        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf_path)
            .arg(&prefix)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|_| ExtractionError::ToolMissing(self.program.clone()))?;

        if !output.status.success() {
            return Err(ExtractionError::Rasterize(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mut numbered = Vec::new();
        let mut entries = tokio::fs::read_dir(out_dir.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(page_number) = name.to_str().and_then(page_number_from_file_name) {
                numbered.push((page_number, entry.path()));
            }
        }
        numbered.sort_by_key(|(page_number, _)| *page_number);

        let mut pages = Vec::with_capacity(numbered.len());
        for (page_number, path) in numbered {
            let png = tokio::fs::read(&path).await?;
            pages.push(PageImage {
                page_number,
                png: Bytes::from(png),
            });
        }

        debug!("Rasterized {} page(s) at {} dpi", pages.len(), self.dpi);
        Ok(pages)
    }
}

/// `pdftoppm` names pages `page-1.png`, or zero-pads (`page-01.png`) when the
/// document has ten or more pages.
fn page_number_from_file_name(name: &str) -> Option<u32> {
    name.strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Runs `tesseract stdin stdout` with the page image piped in.
pub struct TesseractOcr {
    program: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, page: &PageImage) -> Result<String, ExtractionError> {
        let mut child = Command::new(&self.program)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|_| ExtractionError::ToolMissing(self.program.clone()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&page.png).await?;
            // Dropping stdin closes the pipe so tesseract starts recognizing.
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ExtractionError::Ocr(format!(
                "page {}: {} exited with {}: {}",
                page.page_number,
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
