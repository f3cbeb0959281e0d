use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Application configuration loaded from environment variables.
/// Fails at startup if `GOOGLE_API_KEY` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    /// Path or name of poppler's `pdftoppm` binary.
    pub pdftoppm_path: String,
    pub render_dpi: u32,
    pub max_upload_bytes: usize,
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        Ok(Config {
            google_api_key: google_api_key()?,
            gemini_model: optional_env("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_api_base: optional_env("GEMINI_API_BASE", DEFAULT_API_BASE),
            pdftoppm_path: optional_env("PDFTOPPM_PATH", "pdftoppm"),
            render_dpi: parse_env("RENDER_DPI", 200)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", 2 * 60 * 60)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

/// Loads `.env` if present; a missing file is not an error.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Reads the Gemini API key. Blank values count as missing.
pub fn google_api_key() -> Result<String> {
    let key = require_env(GOOGLE_API_KEY)?;
    if key.trim().is_empty() {
        anyhow::bail!("Required environment variable '{GOOGLE_API_KEY}' is empty");
    }
    Ok(key)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests; nothing here touches the network.
    pub fn for_tests() -> Self {
        Config {
            google_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            pdftoppm_path: "pdftoppm".to_string(),
            render_dpi: 72,
            max_upload_bytes: 1024 * 1024,
            session_ttl_secs: 60,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
