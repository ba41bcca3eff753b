//! Multipart upload extraction

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use xtract_core::AppError;

const FILE_FIELD: &str = "file";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// The `file` part of an upload request.
#[derive(Debug)]
pub struct UploadedArchive {
    pub data: Bytes,
    pub file_name: String,
    pub content_type: String,
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(err.body_text());
    }
    AppError::InvalidInput(format!("{}: {}", context, err.body_text()))
}

/// Extract the single field named "file" from a multipart form.
///
/// Other fields are ignored. A second "file" field or a missing one is invalid
/// input. Parts without a content type are treated as `application/octet-stream`,
/// which no archive format accepts.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedArchive, AppError> {
    let mut upload: Option<UploadedArchive> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        upload = Some(UploadedArchive {
            data,
            file_name,
            content_type,
        });
    }

    upload.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}
