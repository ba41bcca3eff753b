//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! (`ArchiveError`, `AppError`, `anyhow::Error`) convert into `HttpAppError`,
//! which renders the `{"detail": ...}` body and logs at the error's level.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use xtract_core::{AppError, ErrorMetadata, LogLevel};
use xtract_services::ArchiveError;

const GENERIC_ERROR_DETAIL: &str = "Internal Server Error";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from xtract-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<ArchiveError> for HttpAppError {
    fn from(err: ArchiveError) -> Self {
        let app = match err {
            ArchiveError::UnsupportedMediaType(media_type) => {
                AppError::UnsupportedMediaType(media_type)
            }
            ArchiveError::PasswordRequired => AppError::PasswordRequired,
            ArchiveError::CorruptArchive(msg) => AppError::CorruptArchive(msg),
            ArchiveError::UnsupportedFormat(format) => {
                AppError::Internal(format!("No archive codec for {}", format))
            }
            ArchiveError::Io(err) => AppError::from(err),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type,
                error_code,
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let detail = if app_error.is_sensitive() {
            GENERIC_ERROR_DETAIL.to_string()
        } else {
            app_error.client_message()
        };
        let body = Json(ErrorResponse { detail });

        (status, body).into_response()
    }
}
