use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use xtract_core::AppError;

/// Build `attachment;filename=<name>`, falling back to the RFC 5987 form for
/// names that are not valid header text.
fn content_disposition(file_name: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("attachment;filename={}", file_name)).unwrap_or_else(|_| {
        let encoded = utf8_percent_encode(file_name, NON_ALPHANUMERIC);
        HeaderValue::from_str(&format!("attachment;filename*=UTF-8''{}", encoded))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
    })
}

/// Convert an uploaded archive to the configured output format.
#[tracing::instrument(skip(state, multipart))]
pub async fn extract_archive(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let upload = extract_multipart_file(multipart).await?;

    tracing::debug!(
        file_name = %upload.file_name,
        content_type = %upload.content_type,
        size = upload.data.len(),
        "Received archive upload"
    );

    // The blocking task owns the scratch directory, so it is cleaned up even
    // when the client goes away before the response is sent.
    let conversion = state.conversion.clone();
    let converted = tokio::task::spawn_blocking(move || {
        conversion.convert(
            &upload.content_type,
            &upload.file_name,
            &mut &upload.data[..],
        )
    })
    .await
    .map_err(|e| AppError::Internal(format!("Conversion task failed: {}", e)))??;

    let response = Response::builder()
        .status(StatusCode::CREATED)
        .header(header::CONTENT_TYPE, converted.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&converted.file_name),
        )
        .body(Body::from(converted.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
