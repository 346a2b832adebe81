mod analysis;
mod config;
mod errors;
mod extraction;
mod ingest;
mod llm_client;
mod routes;
mod state;
mod web;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::extraction::{PdfTextLayer, PdftoppmRasterizer, TesseractOcr, TextExtractor};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Text extraction: embedded text layer first, pdftoppm + tesseract as fallback
    let extractor = TextExtractor::new(
        Arc::new(PdfTextLayer),
        Arc::new(PdftoppmRasterizer::new(
            config.pdftoppm_path.clone(),
            config.ocr_dpi,
        )),
        Arc::new(TesseractOcr::new(
            config.tesseract_path.clone(),
            config.ocr_language.clone(),
        )),
    );
    info!(
        "OCR fallback: {} ({} dpi) + {} [{}]",
        config.pdftoppm_path, config.ocr_dpi, config.tesseract_path, config.ocr_language
    );

    // Initialize LLM client
    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; analysis requests will fail until it is configured");
    }
    let gemini = GeminiClient::new(
        config.google_api_key.clone(),
        config.llm_timeout_secs.map(Duration::from_secs),
    )?;
    let analyzer = AnalysisClient::new(Arc::new(gemini));
    info!("LLM client initialized (model: {})", analyzer.model_name());

    let state = AppState {
        config: config.clone(),
        extractor,
        analyzer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
