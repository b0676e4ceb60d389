// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use training_journal::config::Config;
use training_journal::db::{FirestoreStore, MemoryStore, SortedStore};
use training_journal::middleware::auth::create_jwt;
use training_journal::routes::create_router;
use training_journal::AppState;

/// Password accepted by apps built with [`create_test_app_with_password`].
#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Connect to the Firestore emulator.
#[allow(dead_code)]
pub async fn test_store() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn build_app(config: Config, store: Arc<dyn SortedStore>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, store));
    (create_router(state.clone()), state)
}

/// Create a test app backed by an in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    build_app(Config::test_default(), Arc::new(MemoryStore::new()))
}

/// Create a test app whose store is unreachable.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    build_app(Config::test_default(), Arc::new(FirestoreStore::new_mock()))
}

/// Create a test app that accepts `athlete` / [`TEST_PASSWORD`].
#[allow(dead_code)]
pub fn create_test_app_with_password(secure_cookies: bool) -> (axum::Router, Arc<AppState>) {
    let salt = SaltString::from_b64("aW50ZWdyYXRpb25zYWx0").unwrap();
    let hash = Argon2::default()
        .hash_password(TEST_PASSWORD.as_bytes(), &salt)
        .unwrap()
        .to_string();

    let config = Config {
        app_password_hash: hash,
        secure_cookies,
        ..Config::test_default()
    };
    build_app(config, Arc::new(MemoryStore::new()))
}

/// Session token for `username` signed with the app's key.
#[allow(dead_code)]
pub fn create_test_jwt(username: &str, state: &AppState) -> String {
    create_jwt(username, &state.config.jwt_signing_key).unwrap()
}

/// Send a request with an optional bearer token and JSON body, returning
/// the status and decoded body (`Null` when the body is empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Send a raw body string, for malformed-JSON cases.
#[allow(dead_code)]
pub async fn send_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    body: &'static str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
