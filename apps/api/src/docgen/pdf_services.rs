//! Client for the PDF Services document-generation REST API.
//!
//! One merge is: token → asset upload → generation job → poll → download.
//! Credentials come from `CLIENT_ID` / `CLIENT_SECRET`.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::docgen::{DocGenError, DocumentMerger};
use crate::models::merge::MergePayload;

const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MAX_POLLS: u32 = 60;

/// Service-principal credentials.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetRequest<'a> {
    media_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    #[serde(rename = "uploadUri")]
    upload_uri: String,
    #[serde(rename = "assetID")]
    asset_id: String,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    #[serde(rename = "assetID")]
    asset_id: &'a str,
    #[serde(rename = "outputFormat")]
    output_format: &'a str,
    #[serde(rename = "jsonDataForMerge")]
    json_data_for_merge: &'a MergePayload,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    status: String,
    asset: Option<JobAsset>,
    error: Option<ServiceErrorBody>,
}

#[derive(Debug, Deserialize)]
struct JobAsset {
    #[serde(rename = "downloadUri")]
    download_uri: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: ServiceErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<u16>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PdfServicesClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    poll_interval: Duration,
    max_polls: u32,
}

impl PdfServicesClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, DocGenError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Overrides how often and how many times the job status is polled.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls.max(1);
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    fn authed(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header("x-api-key", &self.credentials.client_id)
    }

    async fn access_token(&self) -> Result<String, DocGenError> {
        let response = self
            .client
            .post(self.url("token"))
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = ensure_success(response).await?.json().await?;
        Ok(token.access_token)
    }

    /// Registers an asset and uploads the template bytes to its pre-signed URI.
    async fn upload_template(&self, token: &str, template: &Path) -> Result<String, DocGenError> {
        let bytes = tokio::fs::read(template).await?;

        let response = self
            .authed(self.client.post(self.url("assets")), token)
            .json(&AssetRequest {
                media_type: DOCX_MEDIA_TYPE,
            })
            .send()
            .await?;
        let asset: AssetResponse = ensure_success(response).await?.json().await?;

        let response = self
            .client
            .put(&asset.upload_uri)
            .header(CONTENT_TYPE, DOCX_MEDIA_TYPE)
            .body(bytes)
            .send()
            .await?;
        ensure_success(response).await?;

        debug!(asset_id = %asset.asset_id, "Template uploaded");
        Ok(asset.asset_id)
    }

    /// Starts the merge job and returns its status URL.
    async fn submit_job(
        &self,
        token: &str,
        asset_id: &str,
        payload: &MergePayload,
    ) -> Result<String, DocGenError> {
        let response = self
            .authed(
                self.client.post(self.url("operation/documentgeneration")),
                token,
            )
            .json(&GenerationRequest {
                asset_id,
                output_format: "pdf",
                json_data_for_merge: payload,
            })
            .send()
            .await?;
        let response = ensure_success(response).await?;

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|location| self.url(location))
            .ok_or_else(|| DocGenError::Protocol("job accepted without a Location header".into()))
    }

    /// Polls the job until it is done, returning the result's download URI.
    async fn wait_for_result(&self, token: &str, location: &str) -> Result<String, DocGenError> {
        for attempt in 0..self.max_polls {
            if attempt > 0 {
                tokio::time::sleep(self.poll_interval).await;
            }

            let response = self
                .authed(self.client.get(location), token)
                .send()
                .await?;
            let job: JobStatus = ensure_success(response).await?.json().await?;

            match job.status.as_str() {
                "done" => {
                    return job.asset.map(|a| a.download_uri).ok_or_else(|| {
                        DocGenError::Protocol("job finished without an asset".into())
                    })
                }
                "failed" => {
                    let body = job.error.unwrap_or_default();
                    let status = body.status.unwrap_or(400);
                    return Err(classify(status, body));
                }
                other => debug!(attempt, status = other, "Merge job not finished yet"),
            }
        }

        Err(DocGenError::Timeout {
            polls: self.max_polls,
        })
    }

    async fn download(&self, uri: &str) -> Result<Bytes, DocGenError> {
        let response = self.client.get(uri).send().await?;
        Ok(ensure_success(response).await?.bytes().await?)
    }
}

#[async_trait]
impl DocumentMerger for PdfServicesClient {
    async fn merge(&self, template: &Path, payload: &MergePayload) -> Result<Bytes, DocGenError> {
        let token = self.access_token().await?;
        let asset_id = self.upload_template(&token, template).await?;
        let location = self.submit_job(&token, &asset_id, payload).await?;
        let download_uri = self.wait_for_result(&token, &location).await?;
        self.download(&download_uri).await
    }
}

/// Passes 2xx responses through; turns anything else into a classified error.
async fn ensure_success(response: Response) -> Result<Response, DocGenError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ServiceError>(&text)
        .map(|e| e.error)
        .unwrap_or_else(|_| ServiceErrorBody {
            code: status
                .canonical_reason()
                .unwrap_or("UNKNOWN")
                .to_uppercase()
                .replace(' ', "_"),
            message: text,
            status: None,
        });
    Err(classify(status.as_u16(), body))
}

/// 429s and quota codes are usage errors; everything else is an API error.
fn classify(status: u16, body: ServiceErrorBody) -> DocGenError {
    if status == 429 || body.code.to_uppercase().contains("QUOTA") {
        DocGenError::ServiceUsage {
            code: body.code,
            message: body.message,
        }
    } else {
        DocGenError::ServiceApi {
            status,
            code: body.code,
            message: body.message,
        }
    }
}
