use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::docgen::DocGenError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown template id, or the template file could not be located.
    #[error("{0}")]
    NotFound(String),

    /// Malformed body or incomplete personal information.
    #[error("{0}")]
    Validation(String),

    /// The document-generation service (or the local file round-trip) failed.
    #[error("Generation failed: {0}")]
    Generation(#[from] DocGenError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(e) => {
                e.log();
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Unauthorised".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
