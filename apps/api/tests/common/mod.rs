#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use resume_api::config::{Config, DEFAULT_PDF_SERVICES_BASE_URL};
use resume_api::docgen::{DocGenError, DocumentMerger};
use resume_api::models::merge::MergePayload;
use resume_api::routes::build_router;
use resume_api::state::AppState;
use resume_api::templates::TemplateId;

/// Merger that renders `%PDF-fake <Name> <LastName>` and records every call.
#[derive(Default)]
pub struct FakeMerger {
    calls: AtomicUsize,
    failing: AtomicBool,
    last: Mutex<Option<(String, MergePayload)>>,
}

impl FakeMerger {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Template file name and payload of the most recent call.
    pub fn last(&self) -> Option<(String, MergePayload)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentMerger for FakeMerger {
    async fn merge(&self, template: &Path, payload: &MergePayload) -> Result<Bytes, DocGenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let file = template
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        *self.last.lock().unwrap() = Some((file, payload.clone()));

        if self.failing.load(Ordering::SeqCst) {
            return Err(DocGenError::ServiceApi {
                status: 401,
                code: "UNAUTHORIZED".into(),
                message: "invalid credentials".into(),
            });
        }
        Ok(Bytes::from(format!(
            "%PDF-fake {} {}",
            payload.name, payload.last_name
        )))
    }
}

/// Router wired to a fake merger with all three templates on disk.
pub struct TestApp {
    pub router: Router,
    pub merger: Arc<FakeMerger>,
    pub templates: TempDir,
    pub output: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_templates(&TemplateId::ALL)
    }

    pub fn with_templates(present: &[TemplateId]) -> Self {
        let templates = tempfile::tempdir().unwrap();
        for id in present {
            std::fs::write(templates.path().join(id.file_name()), b"PK fake docx").unwrap();
        }
        let output = tempfile::tempdir().unwrap();

        let config = Config {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
            pdf_services_base_url: DEFAULT_PDF_SERVICES_BASE_URL.into(),
            templates_dir: templates.path().to_path_buf(),
            output_dir: output.path().to_path_buf(),
            port: 0,
            rust_log: "debug".into(),
        };
        let merger = Arc::new(FakeMerger::default());
        let router = build_router(AppState::new(&config, merger.clone()));

        Self {
            router,
            merger,
            templates,
            output,
        }
    }

    /// Sends a raw body to `POST /api/resume`.
    pub async fn post_raw(&self, body: String) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/resume")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, bytes)
    }

    pub async fn post_resume(&self, body: &Value) -> (StatusCode, HeaderMap, Bytes) {
        self.post_raw(body.to_string()).await
    }

    pub fn output_files(&self) -> usize {
        std::fs::read_dir(self.output.path()).unwrap().count()
    }
}

pub fn error_message(body: &Bytes) -> String {
    let value: Value = serde_json::from_slice(body).expect("error body is JSON");
    value["error"]["message"].as_str().unwrap_or_default().to_string()
}

/// A complete, valid submission for `template_id`.
pub fn sample_submission(template_id: &str) -> Value {
    json!({
        "template_id": template_id,
        "personal_information": {
            "name": "Barbara",
            "last_name": "Liskov",
            "email_address": "barbara@mit.edu",
            "phone_number": "6175550123",
            "linkedin_url": "https://www.linkedin.com/in/barbara-liskov"
        },
        "job_title": "Institute Professor",
        "career_objective": "Design abstractions that last",
        "skills": ["CLU", "Distributed systems"],
        "education": [
            { "school_name": "Stanford", "passing_year": "1968", "description": "PhD" }
        ],
        "experience": [
            { "company_name": "MIT", "passing_year": "1972", "responsibilities": "Research" }
        ],
        "achievements": [
            { "field": "Computing", "awards": "Turing Award" }
        ]
    })
}
