//! `PdfServicesClient` against an in-process mock of the provider API.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use bytes::Bytes;
use serde_json::{json, Value};

use resume_api::docgen::{Credentials, DocGenError, DocumentMerger, PdfServicesClient};
use resume_api::models::merge::MergePayload;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Ok,
    QuotaExceeded,
    JobFails,
    NeverFinishes,
}

#[derive(Clone)]
struct Mock {
    base: String,
    mode: Mode,
    polls: Arc<AtomicU32>,
    uploaded: Arc<Mutex<Vec<u8>>>,
    merged: Arc<Mutex<Option<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer tok-123")
        && headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some("client-id")
}

fn service_error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": code, "message": message, "status": status.as_u16() } })),
    )
        .into_response()
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("client_id").map(String::as_str) == Some("client-id")
        && form.get("client_secret").map(String::as_str) == Some("client-secret")
    {
        Json(json!({ "access_token": "tok-123", "token_type": "bearer", "expires_in": 86399 }))
            .into_response()
    } else {
        service_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "invalid client credentials")
    }
}

async fn assets(State(mock): State<Mock>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return service_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "bad token");
    }
    assert_eq!(
        body["mediaType"],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    Json(json!({
        "uploadUri": format!("{}/upload/asset-1", mock.base),
        "assetID": "asset-1"
    }))
    .into_response()
}

async fn upload(State(mock): State<Mock>, Path(_id): Path<String>, body: Bytes) -> StatusCode {
    *mock.uploaded.lock().unwrap() = body.to_vec();
    StatusCode::OK
}

async fn generate(State(mock): State<Mock>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return service_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "bad token");
    }
    if mock.mode == Mode::QuotaExceeded {
        return service_error(StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXCEEDED", "out of transactions");
    }
    assert_eq!(body["assetID"], "asset-1");
    assert_eq!(body["outputFormat"], "pdf");
    *mock.merged.lock().unwrap() = Some(body["jsonDataForMerge"].clone());
    (
        StatusCode::CREATED,
        [("location", format!("{}/status/job-1", mock.base))],
    )
        .into_response()
}

async fn status(State(mock): State<Mock>, headers: HeaderMap, Path(_job): Path<String>) -> Response {
    if !authorized(&headers) {
        return service_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "bad token");
    }
    let poll = mock.polls.fetch_add(1, Ordering::SeqCst);
    let body = match mock.mode {
        Mode::NeverFinishes => json!({ "status": "in progress" }),
        _ if poll == 0 => json!({ "status": "in progress" }),
        Mode::JobFails => json!({
            "status": "failed",
            "error": { "code": "BAD_TEMPLATE", "message": "template is corrupt", "status": 400 }
        }),
        _ => json!({
            "status": "done",
            "asset": {
                "assetID": "result-1",
                "downloadUri": format!("{}/download/result-1", mock.base)
            }
        }),
    };
    Json(body).into_response()
}

async fn download() -> &'static [u8] {
    b"%PDF-1.7 merged"
}

struct Harness {
    mock: Mock,
    client: PdfServicesClient,
    template: PathBuf,
    _dir: tempfile::TempDir,
}

async fn start(mode: Mode, secret: &str) -> Harness {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let mock = Mock {
        base: base.clone(),
        mode,
        polls: Arc::new(AtomicU32::new(0)),
        uploaded: Arc::new(Mutex::new(Vec::new())),
        merged: Arc::new(Mutex::new(None)),
    };
    let app = Router::new()
        .route("/token", post(token))
        .route("/assets", post(assets))
        .route("/upload/:id", put(upload))
        .route("/operation/documentgeneration", post(generate))
        .route("/status/:job", get(status))
        .route("/download/:id", get(download))
        .with_state(mock.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("BasicTemplate.docx");
    std::fs::write(&template, b"PK template bytes").unwrap();

    let client = PdfServicesClient::new(
        base,
        Credentials {
            client_id: "client-id".into(),
            client_secret: secret.into(),
        },
    )
    .unwrap()
    .with_polling(Duration::from_millis(10), 3);

    Harness {
        mock,
        client,
        template,
        _dir: dir,
    }
}

fn payload() -> MergePayload {
    MergePayload {
        name: "Margaret".into(),
        last_name: "Hamilton".into(),
        email_address: "margaret@mit.edu".into(),
        phone_number: "6175550199".into(),
        linked_in: r#"<a href="https://linkedin.com/in/mh">LinkedIn</a>"#.into(),
        job_title: Some("Director".into()),
        summary: None,
        skills: vec!["Apollo guidance".into()],
        education: vec![],
        experience: vec![],
        achievements: vec![],
    }
}

#[tokio::test]
async fn test_merge_runs_full_flow() {
    let h = start(Mode::Ok, "client-secret").await;

    let pdf = h.client.merge(&h.template, &payload()).await.unwrap();

    assert_eq!(&pdf[..], b"%PDF-1.7 merged");
    assert_eq!(h.mock.uploaded.lock().unwrap().as_slice(), b"PK template bytes");
    let merged = h.mock.merged.lock().unwrap().clone().unwrap();
    assert_eq!(merged["Name"], "Margaret");
    assert_eq!(merged["LinkedIn"], r#"<a href="https://linkedin.com/in/mh">LinkedIn</a>"#);
    assert!(merged.get("Summary").is_none());
    assert_eq!(h.mock.polls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_bad_credentials_are_api_errors() {
    let h = start(Mode::Ok, "wrong").await;

    let err = h.client.merge(&h.template, &payload()).await.unwrap_err();

    match err {
        DocGenError::ServiceApi { status, code, .. } => {
            assert_eq!(status, 401);
            assert_eq!(code, "UNAUTHORIZED");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_quota_exhaustion_is_usage_error() {
    let h = start(Mode::QuotaExceeded, "client-secret").await;

    let err = h.client.merge(&h.template, &payload()).await.unwrap_err();

    assert!(matches!(err, DocGenError::ServiceUsage { ref code, .. } if code == "QUOTA_EXCEEDED"));
}

#[tokio::test]
async fn test_failed_job_reports_provider_error() {
    let h = start(Mode::JobFails, "client-secret").await;

    let err = h.client.merge(&h.template, &payload()).await.unwrap_err();

    match err {
        DocGenError::ServiceApi { status, code, message } => {
            assert_eq!(status, 400);
            assert_eq!(code, "BAD_TEMPLATE");
            assert_eq!(message, "template is corrupt");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_polling_is_bounded() {
    let h = start(Mode::NeverFinishes, "client-secret").await;

    let err = h.client.merge(&h.template, &payload()).await.unwrap_err();

    assert!(matches!(err, DocGenError::Timeout { polls: 3 }));
    assert_eq!(h.mock.polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_missing_template_file_is_io_error() {
    let h = start(Mode::Ok, "client-secret").await;

    let err = h
        .client
        .merge(&h.template.with_file_name("Nope.docx"), &payload())
        .await
        .unwrap_err();

    assert!(matches!(err, DocGenError::Io(_)));
}
