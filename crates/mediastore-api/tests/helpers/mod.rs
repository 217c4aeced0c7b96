//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p mediastore-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use mediastore_api::constants;
use mediastore_api::setup::{routes, services};
use mediastore_core::models::LocationInfo;
use mediastore_core::{Config, ReverseGeocoder};
use mediastore_storage::{LocalStorage, Storage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Base URL the test config advertises.
pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// API path prefix for tests (e.g. `/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Geocoder that answers every lookup with the same place and counts calls.
pub struct FakeGeocoder {
    pub calls: AtomicUsize,
    answer: Option<LocationInfo>,
}

impl FakeGeocoder {
    pub fn new(answer: Option<LocationInfo>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            answer,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Option<LocationInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

pub fn hanoi() -> LocationInfo {
    LocationInfo {
        country: Some("Vietnam".to_string()),
        state: Some("Hanoi".to_string()),
        city: Some("Hanoi".to_string()),
        district: Some("Hoan Kiem".to_string()),
        road: Some("Dinh Tien Hoang".to_string()),
        postal_code: Some("100000".to_string()),
        display_name: Some("Hoan Kiem, Hanoi, Vietnam".to_string()),
    }
}

/// Test application: server plus the owned upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub geocoder: Arc<FakeGeocoder>,
    pub config: Config,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path part of a URL returned by an upload, e.g. `/uploads/uid_42/...`.
    pub fn local_path(url: &str) -> &str {
        url.strip_prefix(TEST_BASE_URL).unwrap_or(url)
    }
}

/// Test config rooted at `upload_dir`; `overrides` replace or add variables.
pub fn create_test_config(upload_dir: &Path, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("JWT_SECRET".to_string(), auth::TEST_JWT_SECRET.to_string()),
        ("BASE_URL".to_string(), TEST_BASE_URL.to_string()),
        ("UPLOAD_DIR".to_string(), upload_dir.display().to_string()),
        ("CORS_ORIGINS".to_string(), "*".to_string()),
        ("GEOCODING_ENABLED".to_string(), "false".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

/// Setup test app with local storage in a temp dir and a fake geocoder.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_geocoder(FakeGeocoder::new(Some(hanoi()))).await
}

pub async fn setup_test_app_with_geocoder(geocoder: Arc<FakeGeocoder>) -> TestApp {
    build_test_app(geocoder, &[]).await
}

/// Setup test app with extra configuration variables (e.g. smaller size limits).
pub async fn setup_test_app_with_env(overrides: &[(&str, &str)]) -> TestApp {
    build_test_app(FakeGeocoder::new(Some(hanoi())), overrides).await
}

async fn build_test_app(geocoder: Arc<FakeGeocoder>, overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(temp_dir.path(), overrides);
    config.validate().expect("Test config must be valid");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(
            temp_dir.path().to_path_buf(),
            format!("{}{}", TEST_BASE_URL, constants::UPLOADS_PATH),
        )
        .await
        .expect("Failed to create local storage"),
    );

    let state = services::build_state(&config, storage, geocoder.clone());
    let router = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        geocoder,
        config,
        temp_dir,
    }
}
