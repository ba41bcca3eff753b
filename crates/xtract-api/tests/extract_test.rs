//! Conversion endpoint integration tests.
//!
//! Run with: `cargo test -p xtract-api --test extract_test`

mod helpers;

use axum::http::header;
use axum_test::multipart::MultipartForm;
use helpers::fixtures::{self, SAMPLE_FILES};
use helpers::setup_test_app;
use serde_json::json;

#[tokio::test]
async fn test_convert_every_input_format_to_zip() {
    let app = setup_test_app();
    let uploads = [
        (fixtures::create_rar(SAMPLE_FILES), "report.rar", "application/vnd.rar"),
        (fixtures::create_zip(SAMPLE_FILES), "report.zip", "application/zip"),
        (fixtures::create_tar(SAMPLE_FILES), "report.tar", "application/x-tar"),
        (fixtures::create_tar_gz(SAMPLE_FILES), "report.tar.gz", "application/gzip"),
    ];

    for (data, file_name, mime_type) in uploads {
        let response = app.upload(data, file_name, mime_type).await;

        assert_eq!(response.status_code(), 201, "upload of {}", file_name);
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "attachment;filename=report.zip"
        );
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/x-zip-compressed"
        );
        assert_eq!(
            fixtures::read_zip(response.as_bytes()),
            fixtures::sample_contents()
        );
    }

    assert_eq!(app.leftover_scratch_dirs(), 0);
}

#[tokio::test]
async fn test_media_type_parameters_are_ignored() {
    let app = setup_test_app();

    let response = app
        .upload(
            fixtures::create_zip(SAMPLE_FILES),
            "bundle.zip",
            "Application/ZIP; charset=binary",
        )
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment;filename=bundle.zip"
    );
}

#[tokio::test]
async fn test_unsupported_media_type() {
    let app = setup_test_app();

    let response = app
        .upload(b"just some notes".to_vec(), "notes.txt", "text/plain")
        .await;

    assert_eq!(response.status_code(), 415);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"detail": "Your archive type is not supported"})
    );
    assert_eq!(app.leftover_scratch_dirs(), 0);
}

#[tokio::test]
async fn test_disabled_input_format_is_unsupported() {
    let app = helpers::setup_test_app_with(|config| {
        config.input_formats = vec![xtract_core::ArchiveFormat::Rar];
    });

    let response = app
        .upload(fixtures::create_zip(SAMPLE_FILES), "a.zip", "application/zip")
        .await;

    assert_eq!(response.status_code(), 415);
}

#[tokio::test]
async fn test_password_protected_archives() {
    let app = setup_test_app();
    let uploads = [
        (
            fixtures::create_encrypted_rar(&[("secret.txt", "0123456789abcdef")]),
            "secret.rar",
            "application/x-rar-compressed",
        ),
        (
            fixtures::create_encrypted_zip(&[("secret.txt", "top secret")]),
            "secret.zip",
            "application/zip",
        ),
    ];

    for (data, file_name, mime_type) in uploads {
        let response = app.upload(data, file_name, mime_type).await;

        assert_eq!(response.status_code(), 501, "upload of {}", file_name);
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({"detail": "Your file is protected by a password"})
        );
    }

    assert_eq!(app.leftover_scratch_dirs(), 0);
}

#[tokio::test]
async fn test_corrupt_archive_hides_details() {
    let app = setup_test_app();

    let response = app
        .upload(b"definitely not a zip".to_vec(), "broken.zip", "application/zip")
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"detail": "Internal Server Error"})
    );
    assert_eq!(app.leftover_scratch_dirs(), 0);
}

#[tokio::test]
async fn test_missing_file_field() {
    let app = setup_test_app();
    let form = MultipartForm::new().add_text("name", "report.rar");

    let response = app.client().post("/extract").multipart(form).await;

    assert_eq!(response.status_code(), 422);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"detail": "No file provided"})
    );
}

#[tokio::test]
async fn test_upload_name_directories_are_dropped() {
    let app = setup_test_app();

    let response = app
        .upload(
            fixtures::create_tar(SAMPLE_FILES),
            "../../uploads/nightly.tar",
            "application/x-tar",
        )
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment;filename=nightly.zip"
    );
}

#[tokio::test]
async fn test_concurrent_uploads_are_isolated() {
    let app = setup_test_app();
    let first = fixtures::create_zip(&[("a.txt", "first")]);
    let second = fixtures::create_zip(&[("a.txt", "second")]);

    let (one, two) = tokio::join!(
        app.upload(first, "one.zip", "application/zip"),
        app.upload(second, "two.zip", "application/zip"),
    );

    assert_eq!(one.status_code(), 201);
    assert_eq!(two.status_code(), 201);
    assert_eq!(
        fixtures::read_zip(one.as_bytes()),
        vec![("a.txt".to_string(), "first".to_string())]
    );
    assert_eq!(
        fixtures::read_zip(two.as_bytes()),
        vec![("a.txt".to_string(), "second".to_string())]
    );
    assert_eq!(app.leftover_scratch_dirs(), 0);
}

#[tokio::test]
async fn test_upload_over_size_limit_is_rejected() {
    let app = helpers::setup_test_app_with(|config| {
        config.max_upload_size_bytes = 1024;
    });
    let payload = "x".repeat(4096);

    let response = app
        .upload(
            fixtures::create_zip(&[("big.txt", payload.as_str())]),
            "big.zip",
            "application/zip",
        )
        .await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(app.leftover_scratch_dirs(), 0);
}

#[tokio::test]
async fn test_concurrency_limit_queues_requests_across_routes() {
    let app = helpers::setup_test_app_with(|config| {
        config.http_concurrency_limit = 1;
    });

    let (health, upload) = tokio::join!(
        app.client().get("/"),
        app.upload(fixtures::create_zip(SAMPLE_FILES), "queued.zip", "application/zip"),
    );

    assert_eq!(health.status_code(), 200);
    assert_eq!(upload.status_code(), 201);
    assert_eq!(
        fixtures::read_zip(upload.as_bytes()),
        fixtures::sample_contents()
    );
    assert_eq!(app.leftover_scratch_dirs(), 0);
}
