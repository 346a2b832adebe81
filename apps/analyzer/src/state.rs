use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; each upload is staged and extracted independently.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: TextExtractor,
    /// Wraps the generative model behind `Arc<dyn GenerativeModel>`, built once at startup.
    pub analyzer: AnalysisClient,
}
