//! Document generation: template + merge payload → PDF bytes.
//!
//! The remote provider sits behind the `DocumentMerger` trait. `AppState`
//! holds an `Arc<dyn DocumentMerger>` so tests can swap in a fake without
//! touching the handler.

pub mod output;
pub mod pdf_services;

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::models::merge::MergePayload;

pub use output::PdfOutput;
pub use pdf_services::{Credentials, PdfServicesClient};

#[derive(Debug, Error)]
pub enum DocGenError {
    /// The provider rejected the request (bad credentials, bad template, ...).
    #[error("Service API error (status {status}, code {code}): {message}")]
    ServiceApi {
        status: u16,
        code: String,
        message: String,
    },

    /// Quota or usage limits reached on the provider account.
    #[error("Service usage error ({code}): {message}")]
    ServiceUsage { code: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Merge job still running after {polls} polls")]
    Timeout { polls: u32 },

    #[error("Unexpected provider response: {0}")]
    Protocol(String),
}

impl DocGenError {
    /// Logs the failure at the request boundary. API and usage errors are
    /// reported separately so quota exhaustion is visible in the logs.
    pub fn log(&self) {
        match self {
            DocGenError::ServiceApi {
                status,
                code,
                message,
            } => tracing::error!(status, code, "Document generation rejected by service: {message}"),
            DocGenError::ServiceUsage { code, message } => {
                tracing::error!(code, "Document generation usage limit reached: {message}")
            }
            other => tracing::error!("Exception encountered while generating PDF: {other}"),
        }
    }
}

/// Merges a JSON payload into a DOCX template and returns the rendered PDF.
#[async_trait]
pub trait DocumentMerger: Send + Sync {
    async fn merge(&self, template: &Path, payload: &MergePayload) -> Result<Bytes, DocGenError>;
}
