use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_OCR_DPI: u32 = 200;

/// Application configuration loaded from environment variables.
///
/// The service credential is optional here: a missing `GOOGLE_API_KEY` surfaces
/// as a failed analysis call, not as a startup failure.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub ocr_language: String,
    pub ocr_dpi: u32,
    pub llm_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            google_api_key: get("GOOGLE_API_KEY"),
            port: parse_or(get("PORT"), "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes: parse_or(
                get("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            pdftoppm_path: get("PDFTOPPM_PATH").unwrap_or_else(|| "pdftoppm".to_string()),
            tesseract_path: get("TESSERACT_PATH").unwrap_or_else(|| "tesseract".to_string()),
            ocr_language: get("OCR_LANGUAGE").unwrap_or_else(|| "eng".to_string()),
            ocr_dpi: parse_or(get("OCR_DPI"), "OCR_DPI", DEFAULT_OCR_DPI)?,
            llm_timeout_secs: get("LLM_TIMEOUT_SECS")
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .context("LLM_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
