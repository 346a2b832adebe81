// Resume analysis: prompt assembly, the model call, and the upload pipeline.
// All model calls go through llm_client::GenerativeModel.

pub mod client;
pub mod handlers;
pub mod pipeline;
pub mod prompts;

pub use client::{AnalysisClient, AnalysisError};
