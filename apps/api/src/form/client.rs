//! HTTP client for `POST /api/resume` plus the submission state machine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::form::schema::{FormErrors, ResumeForm};
use crate::models::resume::ResumeSubmission;

const DEFAULT_FILE_NAME: &str = "cv.pdf";
const GENERIC_FAILURE: &str = "Failed to generate resume";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure; the request never produced a response.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: StatusCode, message: String },
}

/// A PDF returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedResume {
    pub file_name: String,
    pub bytes: Bytes,
}

impl GeneratedResume {
    /// `data:` URL suitable for an embedded preview.
    pub fn preview_url(&self) -> String {
        format!(
            "data:application/pdf;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Writes the PDF into `dir` under its file name and returns the path.
    pub async fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

#[derive(Clone)]
pub struct ResumeClient {
    client: Client,
    base_url: String,
}

impl ResumeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(180))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// POSTs the submission as JSON and returns the generated PDF.
    pub async fn submit(&self, submission: &ResumeSubmission) -> Result<GeneratedResume, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/resume", self.base_url))
            .header(ACCEPT, "application/pdf")
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status,
                message: error_message(&body),
            });
        }

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_file_name)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let bytes = response.bytes().await?;
        debug!(%file_name, bytes = bytes.len(), "Resume received");

        Ok(GeneratedResume { file_name, bytes })
    }
}

/// Pulls the server's message out of `{"error": {"message": ..}}` or
/// `{"error": ".."}`, falling back to a generic message.
fn error_message(body: &str) -> String {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return GENERIC_FAILURE.to_string(),
    };
    let error = &value["error"];
    error["message"]
        .as_str()
        .or_else(|| error.as_str())
        .unwrap_or(GENERIC_FAILURE)
        .to_string()
}

/// `attachment; filename=cv.pdf` → `cv.pdf`.
fn attachment_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Submission state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Succeeded(GeneratedResume),
    Failed(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }
}

/// A form draft together with its latest validation and submission outcome.
/// Failures never touch the draft, so the user can fix and resubmit.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    pub form: ResumeForm,
    state: SubmissionState,
    errors: Option<FormErrors>,
}

impl FormSession {
    pub fn new(form: ResumeForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Validation errors from the last submit attempt, if it was blocked.
    pub fn errors(&self) -> Option<&FormErrors> {
        self.errors.as_ref()
    }

    /// Validates the draft and, when it passes, submits it. Validation
    /// failures block the request and leave the submission state unchanged.
    pub async fn submit(&mut self, client: &ResumeClient) -> &SubmissionState {
        let submission = match self.form.validate() {
            Ok(submission) => submission,
            Err(errors) => {
                self.errors = Some(errors);
                return &self.state;
            }
        };
        self.errors = None;
        self.state = SubmissionState::Loading;

        self.state = match client.submit(&submission).await {
            Ok(resume) => SubmissionState::Succeeded(resume),
            Err(e) => {
                warn!("Resume submission failed: {e}");
                SubmissionState::Failed(e.to_string())
            }
        };
        &self.state
    }
}
