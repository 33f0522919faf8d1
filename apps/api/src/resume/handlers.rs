//! Axum route handler for resume generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeSubmission;
use crate::resume::transform::to_merge_payload;
use crate::resume::validation::{contact, require_personal_fields};
use crate::state::AppState;
use crate::templates::TemplateId;

pub const PDF_FILE_NAME: &str = "cv.pdf";

/// POST /api/resume
///
/// Checks the template id and the contact keys on the raw JSON, maps the
/// submission onto the template fields, merges it into the selected DOCX
/// template and returns the PDF as an attachment.
///
/// The body is read as a plain `Value`; field types are only looked at after
/// the template and key checks.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_create_resume(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let template = TemplateId::from_json(&body["template_id"])?;
    require_personal_fields(&body)?;

    let submission =
        ResumeSubmission::from_json(body).map_err(|e| AppError::Validation(e.to_string()))?;
    let payload = to_merge_payload(contact(submission.personal_information.as_ref()), &submission);

    let template_path = state.templates.resolve(template).await?;
    info!(%template, path = %template_path.display(), "Generating resume");

    let pdf = state
        .output
        .generate(state.merger.as_ref(), &template_path, &payload)
        .await?;

    Ok(pdf_attachment(pdf))
}

fn pdf_attachment(pdf: Bytes) -> Response {
    (
        [
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={PDF_FILE_NAME}"),
            ),
            (CONTENT_TYPE, "application/pdf".to_string()),
        ],
        pdf,
    )
        .into_response()
}
