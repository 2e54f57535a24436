use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compose::ComposeError;

/// Generic message returned for every render failure. Details stay in the logs.
pub const RENDER_FAILED_MESSAGE: &str = "Error generating image";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant answers 500 with `RENDER_FAILED_MESSAGE`; the detail is only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Render error: {0}")]
    Render(#[from] ComposeError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match &self {
            AppError::InvalidRequest(msg) => {
                tracing::error!("Invalid request: {msg}");
                "INVALID_REQUEST"
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                match e {
                    ComposeError::ImageLoad { .. } => "IMAGE_LOAD_ERROR",
                    ComposeError::Encoding(_) => "ENCODING_ERROR",
                    ComposeError::Join(_) => "INTERNAL_ERROR",
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "INTERNAL_ERROR"
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": RENDER_FAILED_MESSAGE
            }
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
