//! Deterministic stand-ins shared by unit tests across modules.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::extraction::{
    ExtractionError, OcrEngine, PageImage, PageOutcome, PageRasterizer, TextExtractor, TextLayer,
};
use crate::llm_client::{GenerativeModel, LlmError};
use crate::state::AppState;

/// Builds a PDF with one page per entry, each showing that string in Helvetica.
/// An empty string produces a page with an empty content stream.
pub fn make_text_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::dictionary;
    use lopdf::{Document, Object, Stream};

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = if text.is_empty() {
            Vec::new()
        } else {
            format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET").into_bytes()
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

pub fn write_temp_pdf(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Text layer returning canned page outcomes on its first call.
pub struct StaticTextLayer {
    outcome: Mutex<Option<Result<Vec<PageOutcome>, ExtractionError>>>,
}

impl StaticTextLayer {
    pub fn pages(pages: Vec<Result<&str, ExtractionError>>) -> Self {
        let pages = pages.into_iter().map(|p| p.map(String::from)).collect();
        Self {
            outcome: Mutex::new(Some(Ok(pages))),
        }
    }

    pub fn unreadable() -> Self {
        Self {
            outcome: Mutex::new(Some(Err(ExtractionError::PdfParsing(
                "unreadable".to_string(),
            )))),
        }
    }
}

impl TextLayer for StaticTextLayer {
    fn extract_pages(&self, _pdf_path: &Path) -> Result<Vec<PageOutcome>, ExtractionError> {
        self.outcome.lock().unwrap().take().unwrap_or(Ok(Vec::new()))
    }
}

/// Produces `count` placeholder page images.
pub struct FakeRasterizer {
    count: u32,
}

impl FakeRasterizer {
    pub fn pages(count: u32) -> Self {
        Self { count }
    }
}

#[async_trait]
impl PageRasterizer for FakeRasterizer {
    async fn rasterize(&self, _pdf_path: &Path) -> Result<Vec<PageImage>, ExtractionError> {
        Ok((1..=self.count)
            .map(|page_number| PageImage {
                page_number,
                png: Bytes::from_static(b"fake-png"),
            })
            .collect())
    }
}

pub struct FailingRasterizer;

#[async_trait]
impl PageRasterizer for FailingRasterizer {
    async fn rasterize(&self, _pdf_path: &Path) -> Result<Vec<PageImage>, ExtractionError> {
        Err(ExtractionError::Rasterize("no pages could be rendered".to_string()))
    }
}

/// OCR engine that answers page N with `texts[N - 1]` and records every call.
pub struct RecordingOcr {
    texts: Vec<String>,
    fail_on: Option<u32>,
    seen: Mutex<Vec<u32>>,
}

impl RecordingOcr {
    pub fn new(texts: Vec<&str>) -> Self {
        Self {
            texts: texts.into_iter().map(String::from).collect(),
            fail_on: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_failure_on(texts: Vec<&str>, page_number: u32) -> Self {
        Self {
            fail_on: Some(page_number),
            ..Self::new(texts)
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn pages_seen(&self) -> Vec<u32> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrEngine for RecordingOcr {
    async fn recognize(&self, page: &PageImage) -> Result<String, ExtractionError> {
        self.seen.lock().unwrap().push(page.page_number);
        if self.fail_on == Some(page.page_number) {
            return Err(ExtractionError::Ocr(format!("page {} unreadable", page.page_number)));
        }
        Ok(self
            .texts
            .get(page.page_number as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}

enum FakeReply {
    Text(String),
    Api { status: u16, message: String },
}

/// Generative model that records prompts and returns a fixed reply.
pub struct FakeModel {
    reply: FakeReply,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: FakeReply::Text(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            reply: FakeReply::Api {
                status,
                message: message.to_string(),
            },
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Api { status, message } => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

pub fn test_config(upload_dir: PathBuf) -> Config {
    Config::from_lookup(|key| match key {
        "UPLOAD_DIR" => Some(upload_dir.to_string_lossy().into_owned()),
        _ => None,
    })
    .unwrap()
}

/// App state backed by fakes: the text layer serves `pages`, OCR serves `ocr_pages`.
pub fn test_state(
    upload_dir: PathBuf,
    pages: Vec<&str>,
    ocr_pages: Vec<&str>,
    model: Arc<FakeModel>,
) -> AppState {
    let page_count = ocr_pages.len() as u32;
    let extractor = TextExtractor::new(
        Arc::new(StaticTextLayer::pages(pages.into_iter().map(Ok).collect())),
        Arc::new(FakeRasterizer::pages(page_count)),
        Arc::new(RecordingOcr::new(ocr_pages)),
    );
    AppState {
        config: test_config(upload_dir),
        extractor,
        analyzer: AnalysisClient::new(model),
    }
}
