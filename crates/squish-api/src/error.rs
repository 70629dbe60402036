//! HTTP error response conversion
//!
//! Wraps `AppError` (orphan rules: we can't implement the external
//! `IntoResponse` trait for the external `AppError` type) and renders the
//! JSON error shapes of the upload contract: storage failures answer
//! `{"error": "Error uploading files", "details": ...}` with a 500, every
//! other surfaced error answers `{"error": <message>}` with its 4xx status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use squish_core::{AppError, LogLevel};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = match app_error {
            AppError::Storage(details) | AppError::Internal(details) => Json(ErrorResponse {
                error: "Error uploading files".to_string(),
                details: Some(details.clone()),
            }),
            _ => Json(ErrorResponse {
                error: app_error.to_string(),
                details: None,
            }),
        };

        (status, body).into_response()
    }
}
