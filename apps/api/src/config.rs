use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_PDF_SERVICES_BASE_URL: &str = "https://pdf-services.adobe.io";

/// Application configuration loaded from environment variables.
/// Fails at startup if the document-generation credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub pdf_services_base_url: String,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            client_id: require_env("CLIENT_ID")?,
            client_secret: require_env("CLIENT_SECRET")?,
            pdf_services_base_url: std::env::var("PDF_SERVICES_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PDF_SERVICES_BASE_URL.to_string()),
            templates_dir: std::env::var("TEMPLATES_DIR")
                .unwrap_or_else(|_| "../Templates".to_string())
                .into(),
            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "./output".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
