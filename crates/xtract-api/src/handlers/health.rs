use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: bool,
    pub detail: &'static str,
}

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: true,
            detail: "Xtract API is online and working.",
        }),
    )
}
