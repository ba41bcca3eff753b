//! Test helpers: build the router against a throwaway scratch root.
//!
//! Run from workspace root: `cargo test -p xtract-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use std::path::Path;
use tempfile::TempDir;
use xtract_api::setup::{build_state, routes};
use xtract_core::Config;

/// Test application: server plus the scratch root it converts in.
pub struct TestApp {
    pub server: TestServer,
    pub scratch_root: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn scratch_root(&self) -> &Path {
        self.scratch_root.path()
    }

    /// Number of scratch directories still present.
    pub fn leftover_scratch_dirs(&self) -> usize {
        std::fs::read_dir(self.scratch_root())
            .expect("Failed to read scratch root")
            .count()
    }

    /// POST `data` to /extract as the `file` field.
    pub async fn upload(&self, data: Vec<u8>, file_name: &str, mime_type: &str) -> TestResponse {
        let part = Part::bytes(bytes::Bytes::from(data))
            .file_name(file_name.to_string())
            .mime_type(mime_type.to_string());
        let form = MultipartForm::new().add_part("file", part);
        self.server.post("/extract").multipart(form).await
    }
}

pub fn create_test_config(scratch_root: &Path) -> Config {
    Config {
        scratch_dir: Some(scratch_root.to_path_buf()),
        ..Config::default()
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

/// Like [`setup_test_app`], with a hook to adjust the configuration.
pub fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let scratch_root = tempfile::tempdir().expect("Failed to create scratch root");
    let mut config = create_test_config(scratch_root.path());
    customize(&mut config);
    config.validate().expect("Invalid test configuration");

    let state = build_state(config.clone()).expect("Failed to build app state");
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        scratch_root,
    }
}
